use news_courier::{CourierError, GNewsSource, NewsSource};
use std::time::Duration;

fn source_for(server: &mockito::ServerGuard) -> GNewsSource {
    let url = format!("{}/headlines", server.url());
    GNewsSource::new(url.clone(), url, Duration::from_secs(5))
}

#[tokio::test]
async fn fetch_parses_the_articles_array() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/headlines")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"totalArticles":2,"articles":[
                {"title":"A","description":"first","url":"https://e.com/a","image":"https://e.com/a.jpg"},
                {"title":"B","description":"second","url":"https://e.com/b","image":"https://e.com/b.jpg"}
            ]}"#,
        )
        .create_async()
        .await;

    let articles = source_for(&server).fetch().await.unwrap();

    mock.assert_async().await;
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "A");
    assert_eq!(articles[1].url, "https://e.com/b");
}

#[tokio::test]
async fn non_success_status_still_parses_the_body() {
    // The provider has been seen answering with real payloads on non-2xx;
    // the fetcher warns but does not abort.
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/headlines")
        .with_status(503)
        .with_body(r#"{"articles":[{"title":"Still here","description":"","url":"","image":""}]}"#)
        .create_async()
        .await;

    let articles = source_for(&server).fetch().await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Still here");
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/headlines")
        .with_status(200)
        .with_body("<html>service down</html>")
        .create_async()
        .await;

    let result = source_for(&server).fetch().await;
    assert!(matches!(result, Err(CourierError::Decode(_))));
}

#[tokio::test]
async fn missing_articles_field_yields_an_empty_batch() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/headlines")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let articles = source_for(&server).fetch().await.unwrap();
    assert!(articles.is_empty());
}
