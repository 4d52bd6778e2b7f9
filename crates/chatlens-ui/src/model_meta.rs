use chatlens_core::UiConfig;
use icu_collator::options::CollatorOptions;
use icu_collator::{CollatorBorrowed, CollatorPreferences};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::OnceLock;

// Alias lists are ordered: the first non-empty string wins.
const PROVIDER_KEYS: [&str; 3] = ["providerID", "providerId", "provider_id"];
const MODEL_KEYS: [&str; 3] = ["modelID", "modelId", "model_id"];

const ASSISTANT_ROLE: &str = "assistant";

/// One metadata record that resolved to a model string.
#[derive(Debug, Clone)]
struct ModelCandidate {
    created: f64,
    id: String,
    role: Option<String>,
    model: String,
}

impl ModelCandidate {
    fn from_meta(meta: &Value) -> Option<Self> {
        let record = meta.as_object()?;
        let model = extract_model_string(meta)?;
        let created = record
            .get("time")
            .and_then(|time| time.get("created"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        Some(Self {
            created,
            id: read_string(record.get("id")).unwrap_or_default().to_string(),
            role: read_string(record.get("role")).map(str::to_string),
            model,
        })
    }

    /// Newest first; equal timestamps put the id that collates later first.
    fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created
            .partial_cmp(&a.created)
            .unwrap_or(Ordering::Equal)
            .then_with(|| compare_ids(&b.id, &a.id))
    }
}

/// Root-locale collator at default strength, the ordering message ids are ranked by.
fn id_collator() -> Option<&'static CollatorBorrowed<'static>> {
    static COLLATOR: OnceLock<Option<CollatorBorrowed<'static>>> = OnceLock::new();
    COLLATOR
        .get_or_init(|| {
            CollatorBorrowed::try_new(CollatorPreferences::default(), CollatorOptions::default())
                .ok()
        })
        .as_ref()
}

fn compare_ids(left: &str, right: &str) -> Ordering {
    match id_collator() {
        Some(collator) => collator.compare(left, right),
        None => left.cmp(right),
    }
}

fn read_string(value: Option<&Value>) -> Option<&str> {
    let trimmed = value?.as_str()?.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn first_alias<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| read_string(record.get(*key)))
}

fn model_from_record(record: &Map<String, Value>) -> Option<String> {
    let provider = first_alias(record, &PROVIDER_KEYS)?;
    let model = first_alias(record, &MODEL_KEYS)?;
    Some(format!("{provider}/{model}"))
}

/// Reads a `provider/model` string out of one message's metadata.
///
/// Provider and model ids are looked up under their camel, Pascal-suffixed and snake
/// spellings, first on the record itself and then on a nested `model` object. Both ids
/// must come from the same level. Anything that is not a JSON object yields `None`.
pub fn extract_model_string(meta: &Value) -> Option<String> {
    let record = meta.as_object()?;
    model_from_record(record).or_else(|| {
        record
            .get("model")
            .and_then(Value::as_object)
            .and_then(model_from_record)
    })
}

/// Picks the model of the most recent message, preferring assistant-authored ones.
///
/// Records are ordered by `time.created` (missing counts as 0), newest first, with ties
/// going to the `id` that sorts later in root-locale collation (so `B` beats `a`). The
/// first assistant record in that order wins; without one, the newest record does.
pub fn pick_latest_model_string(metas: &[Value]) -> Option<String> {
    let mut candidates: Vec<ModelCandidate> =
        metas.iter().filter_map(ModelCandidate::from_meta).collect();
    candidates.sort_by(ModelCandidate::newest_first);

    candidates
        .iter()
        .find(|candidate| candidate.role.as_deref() == Some(ASSISTANT_ROLE))
        .or_else(|| candidates.first())
        .map(|candidate| candidate.model.clone())
}

/// Display text for a message list's model: the picked model or `placeholder`.
pub fn model_label(metas: &[Value], placeholder: &str) -> String {
    pick_latest_model_string(metas).unwrap_or_else(|| placeholder.to_string())
}

/// Model badge text per the UI settings; `None` when badges are turned off.
pub fn model_badge(cfg: &UiConfig, metas: &[Value]) -> Option<String> {
    cfg.show_model_badge.then(|| model_label(metas, &cfg.model_placeholder))
}
