use recipe_scraper::extractors::{Extractor, HeuristicExtractor, JsonLdExtractor};
use recipe_scraper::html::ParsingContext;
use recipe_scraper::ScrapedRecipeDraft;
use url::Url;

fn context(html: &str) -> ParsingContext {
    ParsingContext::new(Url::parse("https://example.com/recipe").unwrap(), html)
}

fn with_json_ld(blocks: &[&str]) -> String {
    let scripts: String = blocks
        .iter()
        .map(|block| format!(r#"<script type="application/ld+json">{block}</script>"#))
        .collect();
    format!("<html><head>{scripts}</head><body></body></html>")
}

#[test]
fn test_minimal_structured_recipe() {
    let html = with_json_ld(&[
        r#"{"@type":"Recipe","name":"Soup","recipeIngredient":["1 cup water"],"recipeInstructions":[{"text":"Boil it"}]}"#,
    ]);
    let draft = JsonLdExtractor.parse(&context(&html)).unwrap();

    assert_eq!(
        draft,
        ScrapedRecipeDraft {
            title: "Soup".to_string(),
            ingredients: vec!["1 cup water".to_string()],
            instructions: vec!["Boil it".to_string()],
            ..Default::default()
        }
    );
}

#[test]
fn test_categories_merge_and_truncate() {
    let html = with_json_ld(&[
        r#"{"@type":"Recipe","name":"Mix","recipeCategory":"A","keywords":"B, C, D, E, F, G"}"#,
    ]);
    let draft = JsonLdExtractor.parse(&context(&html)).unwrap();
    assert_eq!(draft.categories, vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn test_category_and_keyword_lists_are_deduplicated() {
    let html = with_json_ld(&[
        r#"{"@type":"Recipe","name":"Mix","recipeCategory":["Dinner","Soup"],"keywords":["soup","Soup","Easy"]}"#,
    ]);
    let draft = JsonLdExtractor.parse(&context(&html)).unwrap();
    assert_eq!(draft.categories, vec!["Dinner", "Soup", "soup", "Easy"]);
}

#[test]
fn test_bad_block_then_good_block() {
    let html = with_json_ld(&[
        r#"{"@type": "Recipe", "name": "Broken",,}"#,
        r#"{"@type": "WebPage", "name": "Not a recipe"}"#,
        r#"[{"@type": "Person"}, {"@type": "Recipe", "name": "Good"}]"#,
    ]);
    let draft = JsonLdExtractor.parse(&context(&html)).unwrap();
    assert_eq!(draft.title, "Good");
}

#[test]
fn test_image_shapes_pick_first() {
    let shapes = [
        r#""https://example.com/a.jpg""#,
        r#"{"@type": "ImageObject", "url": "https://example.com/a.jpg"}"#,
        r#"["https://example.com/a.jpg", "https://example.com/b.jpg"]"#,
        r#"[{"url": "https://example.com/a.jpg"}, {"url": "https://example.com/b.jpg"}]"#,
    ];
    for shape in shapes {
        let block = format!(r#"{{"@type": "Recipe", "name": "Pic", "image": {shape}}}"#);
        let draft = JsonLdExtractor.parse(&context(&with_json_ld(&[&block]))).unwrap();
        assert_eq!(
            draft.image.as_deref(),
            Some("https://example.com/a.jpg"),
            "image shape {shape}"
        );
    }
}

#[test]
fn test_image_object_with_url_and_content_url() {
    let object = r#"{"@type": "ImageObject", "url": "https://example.com/a.jpg", "contentUrl": "https://example.com/a.jpg", "width": 1200}"#;
    let shapes = [object.to_string(), format!("[{object}]")];
    for shape in shapes {
        let block = format!(r#"{{"@type": "Recipe", "name": "Soup", "image": {shape}}}"#);
        let draft = JsonLdExtractor.parse(&context(&with_json_ld(&[&block]))).unwrap();
        assert_eq!(
            draft.image.as_deref(),
            Some("https://example.com/a.jpg"),
            "image shape {shape}"
        );
    }
}

#[test]
fn test_image_object_with_only_content_url() {
    let block = r#"{"@type": "Recipe", "name": "Soup", "image": {"@type": "ImageObject", "contentUrl": "https://example.com/c.jpg"}}"#;
    let draft = JsonLdExtractor.parse(&context(&with_json_ld(&[block]))).unwrap();
    assert_eq!(draft.image.as_deref(), Some("https://example.com/c.jpg"));
}

#[test]
fn test_instruction_shapes() {
    let cases = [
        (r#""Mix well.""#, vec!["Mix well."]),
        (r#"["Mix.", "", "Bake."]"#, vec!["Mix.", "Bake."]),
        (
            r#"[{"@type": "HowToStep", "name": "Mix."}, {"@type": "HowToStep", "text": "Bake."}]"#,
            vec!["Mix.", "Bake."],
        ),
        (r#"42"#, vec![]),
    ];
    for (shape, expected) in cases {
        let block = format!(
            r#"{{"@type": "Recipe", "name": "Steps", "recipeIngredient": "1 egg", "recipeInstructions": {shape}}}"#
        );
        let draft = JsonLdExtractor.parse(&context(&with_json_ld(&[&block]))).unwrap();
        assert_eq!(draft.instructions, expected, "instructions shape {shape}");
        assert_eq!(draft.ingredients, vec!["1 egg"]);
    }
}

#[test]
fn test_heuristics_on_blog_markup() {
    let html = r#"
        <html><head>
            <title>Weeknight Chili - Blog</title>
            <meta property="og:description" content="Quick and hearty.">
            <meta property="article:tag" content="Chili">
            <meta property="article:tag" content="Beef">
        </head><body>
            <h1>Weeknight Chili</h1>
            <a rel="category tag" href="/c/dinner">Dinner</a>
            <span class="tag">This tag text is much too long to be a category</span>
            <ul>
                <li class="recipe-ingredient">1 lb ground beef</li>
                <li class="recipe-ingredient">1 can beans</li>
            </ul>
            <div class="method">
                Step 1 Brown the beef in a large pot. Step 2 Add everything else and simmer.
            </div>
        </body></html>
    "#;
    let draft = HeuristicExtractor.parse(&context(html)).unwrap();

    assert_eq!(draft.title, "Weeknight Chili");
    assert_eq!(draft.description.as_deref(), Some("Quick and hearty."));
    assert_eq!(draft.categories, vec!["Chili", "Beef", "Dinner"]);
    assert_eq!(draft.ingredients, vec!["1 lb ground beef", "1 can beans"]);
    assert_eq!(
        draft.instructions,
        vec![
            "Brown the beef in a large pot.",
            "Add everything else and simmer."
        ]
    );
}

#[test]
fn test_heuristic_description_falls_back_to_first_paragraph() {
    let html = "<html><body><h1>Tea</h1><p>  Steep   for three minutes. </p><p>Second</p></body></html>";
    let draft = HeuristicExtractor.parse(&context(html)).unwrap();
    assert_eq!(draft.description.as_deref(), Some("Steep for three minutes."));
}
