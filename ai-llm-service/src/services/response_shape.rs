//! Known shapes of a non-streaming completion body.
//!
//! Ollama's `/api/generate` answers with `{"response": ...}`, but proxies and
//! other runtimes in front of the same URL use different envelopes. The body is
//! classified once into [`CompletionShape`], checked in a fixed order, and the
//! last variant keeps the raw JSON so nothing is lost.

use serde_json::Value;

/// Completion body classified by its envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionShape {
    /// `{"response": "..."}` (Ollama `/api/generate`).
    Response(String),
    /// `{"generation": {"content": "..."}}`.
    Generation(String),
    /// `{"generations": [item, ...]}`; only the first item is kept.
    Generations(GenerationItem),
    /// `{"message": {"content": "..."}}` (Ollama `/api/chat`).
    Message(String),
    /// Unknown envelope, rendered verbatim.
    Raw(Value),
}

/// First element of a `generations` array.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationItem {
    /// Non-empty `text` or `content` field.
    Text(String),
    /// Object without usable text; rendered as JSON.
    Other(Value),
}

impl CompletionShape {
    /// Classifies a decoded body. Never fails: unknown bodies become [`CompletionShape::Raw`].
    pub fn classify(body: Value) -> Self {
        let Value::Object(map) = &body else {
            return Self::Raw(body);
        };

        if let Some(v) = map.get("response") {
            return Self::Response(render(v));
        }
        if let Some(content) = map
            .get("generation")
            .and_then(Value::as_object)
            .and_then(|g| g.get("content"))
        {
            return Self::Generation(render(content));
        }
        if let Some(first) = map
            .get("generations")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_object)
        {
            let text = ["text", "content"]
                .iter()
                .filter_map(|k| first.get(*k))
                .find(|v| is_truthy(v))
                .map(render);
            return Self::Generations(match text {
                Some(t) => GenerationItem::Text(t),
                None => GenerationItem::Other(Value::Object(first.clone())),
            });
        }
        if let Some(content) = map
            .get("message")
            .and_then(Value::as_object)
            .and_then(|m| m.get("content"))
        {
            return Self::Message(render(content));
        }

        Self::Raw(body)
    }

    /// Extracts the completion text.
    pub fn into_text(self) -> String {
        match self {
            Self::Response(t) | Self::Generation(t) | Self::Message(t) => t,
            Self::Generations(GenerationItem::Text(t)) => t,
            Self::Generations(GenerationItem::Other(v)) | Self::Raw(v) => v.to_string(),
        }
    }
}

/// Strings are returned as-is; any other JSON value is serialized.
fn render(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_field_wins() {
        let shape = CompletionShape::classify(json!({
            "response": "We open at 9.",
            "message": {"content": "ignored"}
        }));
        assert_eq!(shape, CompletionShape::Response("We open at 9.".into()));
    }

    #[test]
    fn generation_content() {
        let shape = CompletionShape::classify(json!({"generation": {"content": "hi"}}));
        assert_eq!(shape.into_text(), "hi");
    }

    #[test]
    fn generations_prefers_text_then_content() {
        let text = CompletionShape::classify(json!({"generations": [{"text": "a", "content": "b"}]}));
        assert_eq!(text.into_text(), "a");

        let content = CompletionShape::classify(json!({"generations": [{"text": "", "content": "b"}]}));
        assert_eq!(content.into_text(), "b");

        let neither = CompletionShape::classify(json!({"generations": [{"score": 1}]}));
        assert_eq!(neither.into_text(), r#"{"score":1}"#);
    }

    #[test]
    fn empty_generations_fall_through_to_message() {
        let shape = CompletionShape::classify(json!({
            "generations": [],
            "message": {"role": "assistant", "content": "from chat"}
        }));
        assert_eq!(shape, CompletionShape::Message("from chat".into()));
    }

    #[test]
    fn unknown_body_is_rendered_raw() {
        let shape = CompletionShape::classify(json!({"choices": []}));
        assert_eq!(shape.into_text(), r#"{"choices":[]}"#);

        let scalar = CompletionShape::classify(json!("plain"));
        assert_eq!(scalar.into_text(), r#""plain""#);
    }
}
