use recipefy_import::{ImportError, Importer, Settings};
use serde_json::json;

fn test_importer(openai_base_url: &str) -> Importer {
    let settings = Settings {
        openai_api_key: Some("fake_api_key".to_string()),
        openai_base_url: openai_base_url.to_string(),
        ..Settings::default()
    };
    Importer::from_settings(settings).unwrap()
}

fn pin_page_with_outgoing(destination: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(destination.as_bytes()).collect();
    format!(
        r#"
        <html><head>
            <meta property="og:image" content="https://i.pinimg.com/564x/pin.jpg" />
        </head><body>
            <a href="/pin/1234/">related pin</a>
            <a href="/outgoing/?url={encoded}">visit site</a>
        </body></html>
        "#
    )
}

fn destination_page_with_schema() -> String {
    let json_ld = json!({
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebPage", "name": "Cake page"},
            {
                "@type": "Recipe",
                "name": "Chocolate Cake",
                "description": "Rich and moist",
                "image": ["https://example-cdn/cake.jpg"],
                "prepTime": "PT20M",
                "cookTime": "PT1H30M",
                "recipeYield": "8",
                "keywords": "cake, chocolate",
                "recipeIngredient": ["200 g flour", "3 eggs"],
                "recipeInstructions": [
                    {"@type": "HowToStep", "text": "Mix"},
                    {"@type": "HowToStep", "text": "Bake"}
                ]
            }
        ]
    });
    format!(
        r#"<html><head>
        <meta property="og:image" content="https://example-cdn/og.jpg" />
        <script type="application/ld+json">{json_ld}</script>
        </head><body><h1>Cake</h1></body></html>"#
    )
}

#[tokio::test]
async fn pin_with_structured_destination_uses_schema_path() {
    let mut server = mockito::Server::new_async().await;
    let destination = format!("{}/r/cake", server.url());

    let _pin = server
        .mock("GET", "/pin")
        .with_status(200)
        .with_body(pin_page_with_outgoing(&destination))
        .create_async()
        .await;
    let _dest = server
        .mock("GET", "/r/cake")
        .with_status(200)
        .with_body(destination_page_with_schema())
        .create_async()
        .await;

    let importer = test_importer(&server.url());
    let pin_url = format!("{}/pin", server.url());
    let payload = importer.import_pinterest(&pin_url).await.unwrap();

    assert_eq!(payload["title"], "Chocolate Cake");
    assert_eq!(payload["extractedVia"], "pinterest_destination_schema");
    assert_eq!(payload["sourcePlatform"], "pinterest");
    assert_eq!(payload["sourceUrl"], pin_url);
    assert_eq!(payload["prepTime"], "20 min");
    assert_eq!(payload["cookTime"], "1 h 30 min");
    assert_eq!(payload["mediaImageUrl"], "https://example-cdn/cake.jpg");
    assert_eq!(payload["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(payload["instructions"][0]["stepNumber"], 1);
    assert_eq!(payload["instructions"][1]["text"], "Bake");
    assert_eq!(payload["tags"], json!(["cake", "chocolate"]));

    assert_eq!(payload["metadata"]["destinationUrl"], destination);
    let expected_domain = url::Url::parse(&destination).unwrap();
    let expected_domain = format!(
        "{}:{}",
        expected_domain.host_str().unwrap(),
        expected_domain.port().unwrap()
    );
    assert_eq!(payload["metadata"]["destinationDomain"], expected_domain);
}

#[tokio::test]
async fn pin_with_unstructured_destination_falls_back_to_model() {
    let mut server = mockito::Server::new_async().await;
    let destination = format!("{}/r/plain", server.url());

    let _pin = server
        .mock("GET", "/pin")
        .with_status(200)
        .with_body(pin_page_with_outgoing(&destination))
        .create_async()
        .await;
    let _dest = server
        .mock("GET", "/r/plain")
        .with_status(200)
        .with_body("<html><body><p>Grandma's stew: brown the beef, add broth, simmer.</p></body></html>")
        .create_async()
        .await;

    let content = json!({
        "title": "Grandma's Stew",
        "ingredients": ["beef", "broth"],
        "instructions": ["Brown the beef", "Add broth and simmer"],
        "tags": []
    })
    .to_string();
    let openai = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": content}}]}).to_string())
        .create_async()
        .await;

    let importer = test_importer(&server.url());
    let pin_url = format!("{}/pin", server.url());
    let payload = importer.import_pinterest(&pin_url).await.unwrap();

    assert_eq!(payload["title"], "Grandma's Stew");
    assert_eq!(payload["extractedVia"], "pinterest_destination_openai");
    assert_eq!(payload["metadata"]["destinationUrl"], destination);
    // destination has no og:image, so the pin's preview image carries over
    assert_eq!(payload["mediaImageUrl"], "https://i.pinimg.com/564x/pin.jpg");
    assert_eq!(payload["instructions"][1]["stepNumber"], 2);
    openai.assert_async().await;
}

#[tokio::test]
async fn pin_without_destination_extracts_from_pin_page() {
    let mut server = mockito::Server::new_async().await;

    let pin_html = r#"
        <html><head>
            <meta property="og:image" content="https://i.pinimg.com/564x/pin.jpg" />
        </head><body>
            <a href="/pin/999/">another pin</a>
            <a href="https://www.pinterest.com/ideas/">ideas</a>
            <p>One-pan lemon chicken with rice</p>
        </body></html>
    "#;
    let _pin = server
        .mock("GET", "/pin")
        .with_status(200)
        .with_body(pin_html)
        .create_async()
        .await;

    let content = json!({
        "title": "Lemon Chicken",
        "ingredients": ["chicken", "lemon", "rice"],
        "instructions": ["Sear chicken", "Add rice and stock", "Bake"]
    })
    .to_string();
    let _openai = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": content}}]}).to_string())
        .create_async()
        .await;

    let importer = test_importer(&server.url());
    let payload = importer
        .import_pinterest(&format!("{}/pin", server.url()))
        .await
        .unwrap();

    assert_eq!(payload["title"], "Lemon Chicken");
    assert_eq!(payload["extractedVia"], "openai_from_pinterest_pin");
    assert_eq!(payload["mediaImageUrl"], "https://i.pinimg.com/564x/pin.jpg");
    // no destination was resolved, so no referral metadata is attached
    assert!(payload.get("metadata").is_none());
    assert!(payload["tags"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_failure_propagates() {
    let mut server = mockito::Server::new_async().await;
    let _pin = server
        .mock("GET", "/pin")
        .with_status(404)
        .create_async()
        .await;

    let importer = test_importer(&server.url());
    let err = importer
        .import_pinterest(&format!("{}/pin", server.url()))
        .await
        .unwrap_err();

    match err {
        ImportError::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 404),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn destination_fetch_failure_propagates() {
    let mut server = mockito::Server::new_async().await;
    let destination = format!("{}/r/gone", server.url());

    let _pin = server
        .mock("GET", "/pin")
        .with_status(200)
        .with_body(pin_page_with_outgoing(&destination))
        .create_async()
        .await;
    let _dest = server
        .mock("GET", "/r/gone")
        .with_status(500)
        .create_async()
        .await;

    let importer = test_importer(&server.url());
    let err = importer
        .import_pinterest(&format!("{}/pin", server.url()))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::HttpStatus { .. }));
}
