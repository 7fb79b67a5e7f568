use std::sync::Arc;
use std::time::Duration;

use pagewright::core::config::ResolvedConfig;
use pagewright::dom::{Disposition, Document, DomEvent, Link, Location, MemoryDocument};
use pagewright::fetch::HttpFetcher;
use pagewright::Runtime;
use serde_json::Value;
use tokio::sync::mpsc;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

const ROUTES: &str = r#"{
    "/":       { "component": "pages/home.html", "title": "Home" },
    "/about":  { "component": "pages/about.html", "title": "About" },
    "/slow":   { "component": "pages/slow.html", "title": "Slow" },
    "/fast":   { "component": "pages/fast.html", "title": "Fast" },
    "/broken": { "component": "pages/broken.html" }
}"#;

/// Serves `body` for GET `route`.
async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts the env file, route table, shell and not-found page.
async fn mount_site(server: &MockServer) {
    serve(server, "/.env", "# site\nSITE_NAME=\"Pagewright Docs\"\nYEAR=2026\n").await;
    serve(server, "/src/routes.json", ROUTES).await;
    serve(
        server,
        "/src/app.html",
        r#"<header>{{env.SITE_NAME}}</header><main id="app-content"></main>"#,
    )
    .await;
    serve(server, "/src/NotFound.html", "<h1>Nothing at this address</h1>").await;
}

fn runtime_for(server: &MockServer, href: &str) -> Runtime<MemoryDocument> {
    Runtime::new(
        MemoryDocument::at(href),
        Arc::new(HttpFetcher::new(Some(server.uri()))),
        ResolvedConfig::default(),
    )
}

// ============================================================================
// Startup and Rendering
// ============================================================================

#[tokio::test]
async fn test_start_composes_initial_page() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(
        &mock_server,
        "/src/pages/home.html",
        r#"<Hero title="Welcome">to {{env.SITE_NAME}}</Hero><footer>{{env.YEAR}}</footer>"#,
    )
    .await;
    serve(
        &mock_server,
        "/src/components/hero.html",
        r#"<section><img src="@assets/logo.svg"><h1>{{title}}</h1><p>{{children}}</p></section>"#,
    )
    .await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    let document = runtime.document();
    assert_eq!(document.title(), "Home");
    assert!(document.body().contains("<header>Pagewright Docs</header>"));
    assert_eq!(
        document.container_html(),
        Some(
            r#"<section><img src="/src/assets/logo.svg"><h1>Welcome</h1><p>to Pagewright Docs</p></section><footer>2026</footer>"#
        )
    );
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let mut runtime = runtime_for(&mock_server, "/does-not-exist");
    runtime.start().await;

    assert_eq!(
        runtime.document().container_html(),
        Some("<h1>Nothing at this address</h1>")
    );
}

#[tokio::test]
async fn test_missing_not_found_page_uses_fallback_text() {
    let mock_server = MockServer::start().await;
    serve(&mock_server, "/src/routes.json", ROUTES).await;
    serve(&mock_server, "/src/app.html", r#"<main id="app-content"></main>"#).await;

    let mut runtime = runtime_for(&mock_server, "/does-not-exist");
    runtime.start().await;

    assert_eq!(
        runtime.document().container_html(),
        Some("404, page not found")
    );
}

#[tokio::test]
async fn test_route_table_failure_leaves_every_path_unmatched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/src/routes.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    serve(&mock_server, "/src/app.html", r#"<main id="app-content"></main>"#).await;
    serve(&mock_server, "/src/NotFound.html", "<h1>404</h1>").await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    assert!(runtime.routes().is_empty());
    assert_eq!(runtime.document().container_html(), Some("<h1>404</h1>"));
}

#[tokio::test]
async fn test_page_failure_renders_error_message() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let mut runtime = runtime_for(&mock_server, "/broken");
    runtime.start().await;

    assert_eq!(
        runtime.document().container_html(),
        Some("<p>Error: Failed to load page: HTTP 404: Not Found</p>")
    );
}

#[tokio::test]
async fn test_component_failure_leaves_siblings_intact() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(&mock_server, "/src/pages/home.html", "<Good/><Bad/>").await;
    serve(&mock_server, "/src/components/good.html", "<p>good</p>").await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    assert_eq!(
        runtime.document().container_html(),
        Some("<p>good</p><!-- Component Bad failed to load: HTTP 404: Not Found -->")
    );
}

#[tokio::test]
async fn test_repeated_component_fetched_once() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(
        &mock_server,
        "/src/pages/home.html",
        r#"<Card n="1"/><Card n="2"/><Card n="3"/>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/src/components/card.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[{{n}}]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    assert_eq!(runtime.document().container_html(), Some("[1][2][3]"));
    assert!(runtime.components().is_cached("card").await);
}

#[tokio::test]
async fn test_scripts_reexecuted_in_order() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(
        &mock_server,
        "/src/pages/home.html",
        r#"<p>x</p><script src="@assets/app.js" type="module"></script><script>window.ready = true;</script>"#,
    )
    .await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    let scripts = runtime.document().executed_scripts();
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0].src(), Some("/src/assets/app.js"));
    assert!(scripts[0]
        .attributes
        .contains(&("type".to_string(), "module".to_string())));
    assert_eq!(scripts[1].text, "window.ready = true;");
}

// ============================================================================
// Navigation
// ============================================================================

#[tokio::test]
async fn test_link_click_navigates_and_back_restores() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(&mock_server, "/src/pages/home.html", "<h1>home</h1>").await;
    serve(&mock_server, "/src/pages/about.html", "<h1>about</h1>").await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    let blank = runtime.handle_event(DomEvent::LinkClick(
        Link::new("/about").with_target("_blank"),
    ));
    assert_eq!(blank, Disposition::Default);

    let click = runtime.handle_event(DomEvent::LinkClick(Link::new("/about")));
    assert_eq!(click, Disposition::Prevented);
    runtime.settle().await;
    assert_eq!(runtime.document().location().pathname(), "/about");
    assert_eq!(runtime.document().container_html(), Some("<h1>about</h1>"));

    let back = runtime.document_mut().back().unwrap();
    runtime.handle_event(back);
    runtime.settle().await;
    assert_eq!(runtime.document().title(), "Home");
    assert_eq!(runtime.document().container_html(), Some("<h1>home</h1>"));
}

#[tokio::test]
async fn test_hash_only_history_change_does_not_rerender() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/src/pages/home.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>home</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    let anchor = runtime.handle_event(DomEvent::LinkClick(Link::new("#install")));
    assert_eq!(anchor, Disposition::Default);

    // The browser follows the anchor itself; going back is a same-path popstate.
    let hash = Location::parse("/#install").unwrap();
    runtime.document_mut().push_state(&hash);
    let back = runtime.document_mut().back().unwrap();
    runtime.handle_event(back);
    runtime.settle().await;

    assert_eq!(runtime.document().container_writes(), 1);
}

#[tokio::test]
async fn test_stale_render_is_discarded() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(&mock_server, "/src/pages/home.html", "<h1>home</h1>").await;
    serve(&mock_server, "/src/pages/fast.html", "<h1>fast</h1>").await;
    Mock::given(method("GET"))
        .and(path("/src/pages/slow.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<h1>slow</h1>")
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;
    let writes = runtime.document().container_writes();

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        tx.send(DomEvent::LinkClick(Link::new("/slow"))).ok();
        tx.send(DomEvent::LinkClick(Link::new("/fast"))).ok();
        // Keep the loop alive until the slow response has come and gone.
        tokio::time::sleep(Duration::from_millis(600)).await;
    });
    runtime.run(rx).await;

    let document = runtime.document();
    assert_eq!(document.title(), "Fast");
    assert_eq!(document.container_html(), Some("<h1>fast</h1>"));
    assert_eq!(document.container_writes(), writes + 1);
}

#[tokio::test]
async fn test_replace_and_go() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(&mock_server, "/src/pages/home.html", "<h1>home</h1>").await;
    serve(&mock_server, "/src/pages/about.html", "<h1>about</h1>").await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    runtime.replace("/about");
    runtime.settle().await;
    assert_eq!(runtime.document().history_len(), 1);
    assert_eq!(runtime.document().container_html(), Some("<h1>about</h1>"));

    runtime.go("/", false);
    runtime.settle().await;
    assert_eq!(runtime.document().history_len(), 2);
    assert_eq!(runtime.document().container_html(), Some("<h1>home</h1>"));

    runtime.go("/about", true);
    assert_eq!(runtime.document().reloads().len(), 1);
    assert_eq!(runtime.document().container_html(), Some("<h1>home</h1>"));
}

// ============================================================================
// Component Instances
// ============================================================================

#[tokio::test]
async fn test_component_action_carries_instance_state() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    serve(
        &mock_server,
        "/src/pages/home.html",
        r#"<div data-component="Counter"><button data-action="increment">+</button></div>"#,
    )
    .await;

    let mut runtime = runtime_for(&mock_server, "/");
    runtime.start().await;

    let id = runtime.instances().by_name("Counter")[0].id.clone();
    assert!(runtime
        .document()
        .container_html()
        .unwrap()
        .contains(&format!(r#"data-component-id="{id}""#)));

    runtime
        .instances_mut()
        .get_mut(&id)
        .unwrap()
        .state
        .insert("count".to_string(), Value::from(4));

    let click = runtime.document().click_action(&id, "increment").unwrap();
    assert_eq!(runtime.handle_event(click), Disposition::Default);

    let sent = runtime.document().notifications();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].event, "component-increment");
    assert_eq!(sent[0].component_name, "Counter");
    assert_eq!(sent[0].component_id, id);
    assert_eq!(sent[0].state.get("count"), Some(&Value::from(4)));
}
