// tests/importer_pipeline.rs
//! End-to-end imports against fixture workspaces.

mod common;

use common::*;
use notion_importer::{ImportOptions, OutputFormat};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn full_import_renders_every_output() {
    let (_, importer, _dir) = importer(launch_workspace()).await;

    let record = importer.import(PAGE_URL, ImportOptions::default()).await.unwrap();

    assert_eq!(record.title, "Launch plan");
    assert_eq!(record.source_url, PAGE_URL);
    assert_eq!(record.icon.as_deref(), Some("🚀"));
    assert_eq!(record.cover.as_deref(), Some("https://img.example/cover.png"));
    assert_eq!(record.markdown.as_deref(), Some(LAUNCH_MARKDOWN));

    let html = record.html.unwrap();
    assert!(html.starts_with("<h1>Launch plan</h1>\n<p>Ship <strong>v2</strong> by <a href=\"https://cal.example/fri\">Friday</a></p>\n<ul>\n<li>Alpha</li>\n<li>Beta</li>\n</ul>\n"));
    assert!(html.contains("<pre><code class=\"language-rust\">let x = 1 &lt; 2;</code></pre>\n"));
    assert!(html.contains("<thead>\n<tr><th>Name</th><th>Qty</th></tr>\n</thead>"));
    assert!(html.ends_with("<p>Left column</p>\n"));

    let blocks = record.blocks.unwrap();
    assert_eq!(blocks.len(), 12);
    assert_eq!(blocks[5].children().map(|c| c.len()), Some(1));
}

#[tokio::test]
async fn properties_are_normalized() {
    let (_, importer, _dir) = importer(launch_workspace()).await;

    let record = importer.import(PAGE_ID, ImportOptions::default()).await.unwrap();

    assert_eq!(record.properties.len(), 5);
    assert_eq!(record.properties["Name"], json!("Launch plan"));
    assert_eq!(record.properties["Status"], json!("In progress"));
    assert_eq!(record.properties["Tags"], json!(["launch", "q2"]));
    assert_eq!(
        record.properties["Owner"],
        json!([{ "id": "u-1", "name": "Robin", "avatarUrl": null }])
    );
    assert_eq!(record.properties["Approved"], json!(false));
}

#[tokio::test]
async fn repeated_imports_are_byte_identical_and_free() {
    let (notion, importer, _dir) = importer(launch_workspace()).await;

    let first = importer.import(PAGE_URL, ImportOptions::default()).await.unwrap();
    let calls = notion.calls();
    let second = importer.import(PAGE_URL, ImportOptions::default()).await.unwrap();

    assert_eq!(notion.calls(), calls);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn cache_holds_the_widest_record_after_a_narrow_import() {
    let (_, importer, dir) = importer(launch_workspace()).await;
    let html_only = ImportOptions {
        format: OutputFormat::Html,
        ..ImportOptions::default()
    };

    let record = importer.import(PAGE_URL, html_only).await.unwrap();
    assert!(record.markdown.is_none() && record.blocks.is_none());

    let stored: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(format!("{}.json", PAGE_ID))).unwrap(),
    )
    .unwrap();
    assert_eq!(stored["markdown"], json!(LAUNCH_MARKDOWN));
    assert!(stored["html"].is_string());
    assert!(stored["blocks"].is_array());
    assert_eq!(stored["id"], json!("8a1f6a1e-5c2b-4d0f-9e3a-7b6c5d4e3f21"));
}

#[tokio::test]
async fn long_listings_are_followed_across_pages() {
    let (notion, importer, _dir) = importer(launch_workspace().page_size(5)).await;
    let options = ImportOptions {
        format: OutputFormat::Markdown,
        use_cache: false,
        include_children: true,
    };

    let record = importer.import(PAGE_URL, options).await.unwrap();

    assert_eq!(record.markdown.as_deref(), Some(LAUNCH_MARKDOWN));
    // Page metadata, three pages of root children, then one listing each
    // for the toggle, table, column list and column.
    assert_eq!(notion.calls(), 1 + 3 + 4);
}

#[tokio::test]
async fn flat_imports_render_the_same_markdown() {
    let (_, importer, _dir) = importer(launch_workspace()).await;
    let options = ImportOptions {
        format: OutputFormat::All,
        use_cache: false,
        include_children: false,
    };

    let record = importer.import(PAGE_URL, options).await.unwrap();

    assert_eq!(record.markdown.as_deref(), Some(LAUNCH_MARKDOWN));
    let blocks = record.blocks.unwrap();
    assert!(blocks.iter().all(|block| block.children().is_none()));
}

#[tokio::test]
async fn failing_subtrees_degrade_without_failing_the_import() {
    let (_, importer, _dir) = importer(launch_workspace().fail_children("b-toggle")).await;

    let record = importer.import(PAGE_URL, ImportOptions::default()).await.unwrap();

    let markdown = record.markdown.unwrap();
    assert!(markdown.contains("<details><summary>Details</summary>\n\n</details>\n\n"));
    assert!(markdown.contains("| Apples | 3 |"));
    let blocks = record.blocks.unwrap();
    assert_eq!(blocks[5].children().map(|c| c.len()), Some(0));
}

#[tokio::test]
async fn unauthorized_pages_are_access_failures() {
    let (_, importer, _dir) = importer(launch_workspace().deny(&page_id())).await;

    let err = importer.import(PAGE_URL, ImportOptions::default()).await.unwrap_err();

    assert!(err.is_access_denied());
    assert!(!err.is_invalid_reference());
}

#[tokio::test]
async fn missing_pages_are_not_access_failures() {
    let (_, importer, _dir) = importer(FixtureNotion::new()).await;

    let err = importer.import(PAGE_URL, ImportOptions::default()).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!err.is_access_denied());
}
