use super::Extractor;
use crate::html::{HtmlTree, ParsingContext};
use crate::model::{non_empty, push_category, ScrapedRecipeDraft};
use html_escape::decode_html_entities;
use log::debug;
use serde::Deserialize;
use serde_json::{Number, Value};

/// Reads schema.org `Recipe` objects embedded as JSON-LD
pub struct JsonLdExtractor;

// Every field is optional and every enum has a catch-all variant, so an
// unexpected shape drops that field instead of the whole recipe. List
// variants come before struct variants: serde accepts arrays for structs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonLdRecipe {
    name: Option<Text>,
    description: Option<Text>,
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "recipeCategory")]
    recipe_category: Option<StringOrList>,
    keywords: Option<StringOrList>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "prepTime")]
    prep_time: Option<Text>,
    #[serde(rename = "cookTime")]
    cook_time: Option<Text>,
    #[serde(rename = "totalTime")]
    total_time: Option<Text>,
    author: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Text {
    Plain(String),
    Object(TextObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

impl ImageObject {
    fn into_url(self) -> Option<String> {
        self.url
            .as_deref()
            .and_then(clean)
            .or_else(|| self.content_url.as_deref().and_then(clean))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageItem {
    Url(String),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    Url(String),
    Multiple(Vec<ImageItem>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientItem {
    Text(String),
    Object(IngredientObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Single(String),
    Multiple(Vec<IngredientItem>),
    Other(Value),
}

/// HowToStep, HowToSection or a bare `{text}` / `{name}` object
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstructionObject {
    text: Option<String>,
    name: Option<String>,
    #[serde(rename = "itemListElement")]
    item_list_element: Option<Vec<InstructionItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionItem {
    Text(String),
    Nested(Vec<InstructionItem>),
    Step(InstructionObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    Single(String),
    Multiple(Vec<InstructionItem>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<Value>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    Text(String),
    Number(Number),
    Many(Vec<Value>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct AuthorObject {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Author {
    Name(String),
    Many(Vec<Author>),
    Person(AuthorObject),
    Other(Value),
}

impl TryFrom<&Value> for JsonLdRecipe {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        JsonLdRecipe::deserialize(value)
    }
}

fn decode_html_symbols(text: &str) -> String {
    // some sites double-encode (&amp;amp;), so decode twice
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

fn clean(text: &str) -> Option<String> {
    non_empty(decode_html_symbols(text))
}

impl Text {
    fn into_text(self) -> Option<String> {
        match self {
            Text::Plain(text) => clean(&text),
            Text::Object(obj) => clean(&obj.text),
            Text::Other(_) => None,
        }
    }
}

impl ImageType {
    /// The primary image: the value itself, its `url`, or the first entry of a list
    fn primary(self) -> Option<String> {
        match self {
            ImageType::Url(url) => clean(&url),
            ImageType::Object(obj) => obj.into_url(),
            ImageType::Multiple(items) => match items.into_iter().next()? {
                ImageItem::Url(url) => clean(&url),
                ImageItem::Object(obj) => obj.into_url(),
                ImageItem::Other(_) => None,
            },
            ImageType::Other(_) => None,
        }
    }
}

impl RecipeIngredients {
    fn into_lines(self) -> Vec<String> {
        match self {
            RecipeIngredients::Single(line) => clean(&line).into_iter().collect(),
            RecipeIngredients::Multiple(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    IngredientItem::Text(line) => clean(&line),
                    IngredientItem::Object(obj) => {
                        let name = clean(&obj.name)?;
                        match obj.amount.as_deref().map(str::trim) {
                            Some(amount) if !amount.is_empty() => Some(format!("{amount} {name}")),
                            _ => Some(name),
                        }
                    }
                    IngredientItem::Other(_) => None,
                })
                .collect(),
            RecipeIngredients::Other(_) => Vec::new(),
        }
    }
}

fn collect_steps(item: InstructionItem, steps: &mut Vec<String>) {
    match item {
        InstructionItem::Text(text) => steps.extend(clean(&text)),
        InstructionItem::Step(step) => match step.item_list_element {
            // HowToSection: its own name is a heading, the steps are inside
            Some(items) if !items.is_empty() => {
                for item in items {
                    collect_steps(item, steps);
                }
            }
            _ => {
                let text = step
                    .text
                    .as_deref()
                    .and_then(clean)
                    .or_else(|| step.name.as_deref().and_then(clean));
                steps.extend(text);
            }
        },
        InstructionItem::Nested(items) => {
            for item in items {
                collect_steps(item, steps);
            }
        }
        InstructionItem::Other(_) => {}
    }
}

impl RecipeInstructions {
    fn into_steps(self) -> Vec<String> {
        match self {
            RecipeInstructions::Single(text) => clean(&text).into_iter().collect(),
            RecipeInstructions::Multiple(items) => {
                let mut steps = Vec::new();
                for item in items {
                    collect_steps(item, &mut steps);
                }
                steps
            }
            RecipeInstructions::Other(_) => Vec::new(),
        }
    }
}

impl StringOrList {
    /// Entries of the list; a single string is split on `separator` if given
    fn into_entries(self, separator: Option<char>) -> Vec<String> {
        match self {
            StringOrList::One(text) => match separator {
                Some(sep) => text.split(sep).filter_map(clean).collect(),
                None => clean(&text).into_iter().collect(),
            },
            StringOrList::Many(values) => values
                .iter()
                .filter_map(Value::as_str)
                .filter_map(clean)
                .collect(),
            StringOrList::Other(_) => Vec::new(),
        }
    }
}

impl RecipeYield {
    fn into_text(self) -> Option<String> {
        match self {
            RecipeYield::Text(text) => clean(&text),
            RecipeYield::Number(n) => Some(n.to_string()),
            RecipeYield::Many(values) => {
                let entries: Vec<String> = values
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => clean(s),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                // prefer the descriptive entry ("12 cookies") over a bare number
                entries
                    .iter()
                    .find(|s| s.contains(char::is_alphabetic))
                    .or_else(|| entries.first())
                    .cloned()
            }
            RecipeYield::Other(_) => None,
        }
    }
}

impl Author {
    fn collect_names(self, names: &mut Vec<String>) {
        match self {
            Author::Name(name) => names.extend(clean(&name)),
            Author::Person(person) => names.extend(person.name.as_deref().and_then(clean)),
            Author::Many(authors) => {
                for author in authors {
                    author.collect_names(names);
                }
            }
            Author::Other(_) => {}
        }
    }
}

/// ISO 8601 durations (`PT1H30M`, `PT5400.0S`) as words; anything else as-is
fn humanize_duration(duration: &str) -> String {
    let Some(components) = duration.strip_prefix("PT") else {
        return duration.to_string();
    };

    // ranges such as PT15-20M are kept verbatim
    if let Some(range) = components.strip_suffix('M').filter(|m| m.contains('-')) {
        if range.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return format!("{range} minutes");
        }
    }

    let mut total_seconds = 0.0;
    let mut number = String::new();
    for c in components.chars() {
        let unit_seconds = match c {
            'H' => 3600.0,
            'M' => 60.0,
            'S' => 1.0,
            _ => {
                number.push(c);
                continue;
            }
        };
        let Ok(value) = number.parse::<f64>() else {
            return duration.to_string();
        };
        total_seconds += value * unit_seconds;
        number.clear();
    }
    if !number.is_empty() {
        return duration.to_string();
    }

    let total_minutes = (total_seconds / 60.0).round() as u64;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    let plural = |n: u64| if n == 1 { "" } else { "s" };

    match (hours, minutes) {
        (0, m) => format!("{m} minute{}", plural(m)),
        (h, 0) => format!("{h} hour{}", plural(h)),
        (h, m) => format!("{h} hour{} {m} minute{}", plural(h), plural(m)),
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => kind.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| kind.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// The recipe object itself, the first recipe in a top-level array, or the
/// first recipe inside an `@graph`
fn find_recipe(json: &Value) -> Option<&Value> {
    match json {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(_) if is_recipe_type(json) => Some(json),
        Value::Object(_) => json.get("@graph").and_then(find_recipe),
        _ => None,
    }
}

fn sanitize_json(raw: &str) -> &str {
    let mut cleaned = raw.trim();
    for (open, close) in [("<!--", "-->"), ("//<![CDATA[", "//]]>"), ("<![CDATA[", "]]>")] {
        if let Some(inner) = cleaned.strip_prefix(open) {
            cleaned = inner.strip_suffix(close).unwrap_or(inner).trim();
        }
    }
    cleaned
}

impl JsonLdRecipe {
    fn into_draft(self) -> ScrapedRecipeDraft {
        let mut categories = Vec::new();
        if let Some(category) = self.recipe_category {
            for value in category.into_entries(None) {
                push_category(&mut categories, &value);
            }
        }
        if let Some(keywords) = self.keywords {
            for value in keywords.into_entries(Some(',')) {
                push_category(&mut categories, &value);
            }
        }

        let author = self.author.and_then(|author| {
            let mut names = Vec::new();
            author.collect_names(&mut names);
            non_empty(names.join(", "))
        });

        let duration = |time: Option<Text>| {
            time.and_then(Text::into_text)
                .map(|t| humanize_duration(&t))
        };

        ScrapedRecipeDraft {
            title: self.name.and_then(Text::into_text).unwrap_or_default(),
            description: self.description.and_then(Text::into_text),
            ingredients: self
                .recipe_ingredient
                .map(RecipeIngredients::into_lines)
                .unwrap_or_default(),
            instructions: self
                .recipe_instructions
                .map(RecipeInstructions::into_steps)
                .unwrap_or_default(),
            categories,
            notes: None,
            image: self.image.and_then(ImageType::primary),
            images: Vec::new(),
            servings: self.recipe_yield.and_then(RecipeYield::into_text),
            prep_time: duration(self.prep_time),
            cook_time: duration(self.cook_time),
            total_time: duration(self.total_time),
            author,
        }
    }
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ScrapedRecipeDraft> {
        let scripts = context
            .document
            .find_all(r#"script[type="application/ld+json"]"#);
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags on {}",
            scripts.len(),
            context.url
        );

        for (index, script) in scripts.iter().enumerate() {
            let raw_json: String = script.text().collect();
            let json_ld = match serde_json::from_str::<Value>(sanitize_json(&raw_json)) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {index}: {e}");
                    continue;
                }
            };

            let Some(recipe) = find_recipe(&json_ld) else {
                debug!("JsonLdExtractor: No recipe found in JSON-LD {index}");
                continue;
            };

            match JsonLdRecipe::try_from(recipe) {
                Ok(recipe) => {
                    debug!("JsonLdExtractor: Found recipe in JSON-LD {index}");
                    return Some(recipe.into_draft());
                }
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to convert JSON-LD {index}: {e}");
                }
            }
        }

        None
    }
}
