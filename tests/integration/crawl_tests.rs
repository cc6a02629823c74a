//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full harvest cycle end-to-end, from listing pages to JSON files.

use listing_harvest::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use listing_harvest::crawler::run_harvest;
use listing_harvest::{ConfigError, HarvestError, JsonFileSink, Profile};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given site
fn create_test_config(
    base_url: &str,
    profile: Profile,
    tag: Option<&str>,
    total_pages: Option<u32>,
    results_dir: &Path,
) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            profile,
            tag: tag.map(str::to_string),
            page_size: None,
        },
        crawler: CrawlerConfig {
            total_pages,
            workers: Some(3),
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        user_agent: UserAgentConfig {
            value: Some("TestBot/1.0".to_string()),
        },
        output: OutputConfig {
            results_dir: results_dir.display().to_string(),
        },
    }
}

fn movie_detail(name: &str, score: &str) -> String {
    format!(
        r#"<div class="item el-row">
             <img src="https://img.example.com/{name}.jpg" class="cover">
             <h2 class="m-b-sm">{name}</h2>
             <button class="el-button category"><span>Drama</span></button>
             <span>1994-09-10 上映</span>
             <div class="drama"><h3>Plot</h3><p>About {name}.</p></div>
             <p class="score m-t-md">{score}</p>
           </div>"#
    )
}

async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

fn json_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read results dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_harvest_paged_site() {
    let mock_server = MockServer::start().await;

    mount(
        &mock_server,
        "/page/1",
        ResponseTemplate::new(200).set_body_string(
            r#"<div class="el-card">
               <a href="/detail/1" class="name"><h2>Alpha</h2></a>
               <a href="/detail/2" class="name"><h2>Beta</h2></a>
               </div>"#,
        ),
    )
    .await;
    mount(
        &mock_server,
        "/page/2",
        ResponseTemplate::new(200)
            .set_body_string(r#"<a href="/detail/3" class="name"><h2>Gamma/Delta</h2></a>"#),
    )
    .await;
    // Page 3 is down; its task yields no links
    mount(&mock_server, "/page/3", ResponseTemplate::new(500)).await;

    mount(
        &mock_server,
        "/detail/1",
        ResponseTemplate::new(200).set_body_string(movie_detail("Alpha", "9.1")),
    )
    .await;
    // Detail 2 is gone; it is skipped
    mount(&mock_server, "/detail/2", ResponseTemplate::new(404)).await;
    mount(
        &mock_server,
        "/detail/3",
        ResponseTemplate::new(200).set_body_string(movie_detail("Gamma/Delta", "8.0")),
    )
    .await;

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let results = tmp.path().join("results");
    let config = create_test_config(
        &mock_server.uri(),
        Profile::Movies,
        None,
        Some(3),
        &results,
    );

    let summary = run_harvest(&config, None).await.expect("Harvest failed");

    assert_eq!(summary.pages_total, 3);
    assert_eq!(summary.pages_with_links, 2);
    assert_eq!(summary.links_found, 3);
    assert_eq!(summary.records_saved, 2);
    assert_eq!(summary.details_skipped, 1);
    assert_eq!(summary.persistence_failures, 0);

    assert_eq!(json_files(&results), vec!["Alpha.json", "Gamma_Delta.json"]);

    let sink = JsonFileSink::new(&results).unwrap();
    let alpha = sink.load(&results.join("Alpha.json")).unwrap();
    assert_eq!(alpha.text("name"), Some("Alpha"));
    assert_eq!(alpha.text("cover"), Some("https://img.example.com/Alpha.jpg"));
    assert_eq!(alpha.list("categories").unwrap(), &["Drama".to_string()]);
    assert_eq!(alpha.text("published_at"), Some("1994-09-10"));
    assert_eq!(alpha.text("drama"), Some("About Alpha."));
    assert_eq!(alpha.text("score"), Some("9.1"));
}

#[tokio::test]
async fn test_page_override_limits_crawl() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/page/1",
        ResponseTemplate::new(200).set_body_string(r#"<a href="/detail/1" class="name">A</a>"#),
    )
    .await;
    mount(
        &mock_server,
        "/detail/1",
        ResponseTemplate::new(200).set_body_string(movie_detail("Alpha", "9.1")),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(
        &mock_server.uri(),
        Profile::Movies,
        None,
        Some(50),
        tmp.path(),
    );

    let summary = run_harvest(&config, Some(1)).await.unwrap();

    assert_eq!(summary.pages_total, 1);
    assert_eq!(summary.records_saved, 1);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_full_harvest_tag_site_discovers_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tag/programming"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<ul>
                <li><h2 class=""><a href="{base}/subject/1/" title="One">One</a></h2></li>
               </ul>
               <div class="paginator">
                 <span class="thispage">1</span>
                 <a href="?start=20&type=T">2</a>
                 <span class="next"><a href="?start=20&type=T">后页</a></span>
               </div>"#,
            base = mock_server.uri()
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tag/programming"))
        .and(query_param("start", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<h2 class=""><a href="{base}/subject/2/" title="Two">Two</a></h2>"#,
            base = mock_server.uri()
        )))
        .mount(&mock_server)
        .await;

    mount(
        &mock_server,
        "/subject/1/",
        ResponseTemplate::new(200).set_body_string(
            r#"<h1><span property="v:itemreviewed">One</span></h1>
               <span class="pl">副标题:</span> First Steps<br/>
               <span class="pl">ISBN:</span> 9780000000001<br/>"#,
        ),
    )
    .await;
    mount(
        &mock_server,
        "/subject/2/",
        ResponseTemplate::new(200)
            .set_body_string(r#"<h1><span property="v:itemreviewed">Two</span></h1>"#),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let base = format!("{}/tag", mock_server.uri());
    let config = create_test_config(&base, Profile::Books, Some("programming"), None, tmp.path());

    let summary = run_harvest(&config, None).await.expect("Harvest failed");

    assert_eq!(summary.pages_total, 2);
    assert_eq!(summary.records_saved, 2);
    assert_eq!(json_files(tmp.path()), vec!["One_First Steps.json", "Two.json"]);

    let sink = JsonFileSink::new(tmp.path()).unwrap();
    let one = sink.load(&tmp.path().join("One_First Steps.json")).unwrap();
    assert_eq!(one.text("title"), Some("One:First Steps"));
    assert_eq!(one.text("isbn"), Some("9780000000001"));
    assert!(one.get("author").unwrap().is_absent());

    let two = sink.load(&tmp.path().join("Two.json")).unwrap();
    assert_eq!(two.text("title"), Some("Two"));
    assert_eq!(two.field_names().count(), 10);
}

#[tokio::test]
async fn test_single_page_listing_aborts_before_crawling() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tag/programming"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h2 class=""><a href="/subject/1/">One</a></h2>
               <div class="paginator"><span class="thispage">1</span></div>"#,
        ))
        .mount(&mock_server)
        .await;

    let tmp = TempDir::new().unwrap();
    let base = format!("{}/tag", mock_server.uri());
    let config = create_test_config(&base, Profile::Books, Some("programming"), None, tmp.path());

    let result = run_harvest(&config, None).await;

    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::PageCountUnavailable { .. }))
    ));
    // Only the discovery request was made; no detail page was touched
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(json_files(tmp.path()).is_empty());
}
