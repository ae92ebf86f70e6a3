use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Minimal JSON Schema node, enough to describe the reply layout to the model.
#[derive(Debug, Serialize, Clone, Default)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl JsonSchema {
    fn leaf(schema_type: &str, description: &str) -> Self {
        Self {
            schema_type: schema_type.to_string(),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    pub fn string(description: &str) -> Self {
        Self::leaf("string", description)
    }

    pub fn boolean(description: &str) -> Self {
        Self::leaf("boolean", description)
    }

    pub fn array(items: JsonSchema, description: &str) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::leaf("array", description)
        }
    }

    /// Object node; every property not listed in `optional` is required.
    pub fn object(description: &str, properties: Vec<(&str, JsonSchema)>, optional: &[&str]) -> Self {
        let required = properties
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| !optional.contains(name))
            .map(str::to_string)
            .collect();
        Self {
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            required: Some(required),
            ..Self::leaf("object", description)
        }
    }

    pub fn with_enum(mut self, values: &[&str]) -> Self {
        self.r#enum = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

fn dish_schema(description: &str) -> JsonSchema {
    JsonSchema::object(
        description,
        vec![
            ("name", JsonSchema::string("料理名")),
            ("description", JsonSchema::string("その料理の簡単な説明")),
        ],
        &[],
    )
}

fn question_schema() -> JsonSchema {
    JsonSchema::object(
        "ユーザーへの質問。提案の場合はnullになります。",
        vec![
            ("type", JsonSchema::string("常に \"question\"").with_enum(&["question"])),
            ("message", JsonSchema::string("ユーザーへの質問文")),
            (
                "options",
                JsonSchema::array(JsonSchema::string("選択肢"), "ユーザーに示す回答の選択肢リスト"),
            ),
            (
                "free_text_allowed",
                JsonSchema::boolean("自由入力を許可するかどうかを示すフラグ").with_default(Value::Bool(true)),
            ),
        ],
        &["type", "free_text_allowed"],
    )
}

fn suggestion_schema() -> JsonSchema {
    let menu_set = JsonSchema::object(
        "主菜・副菜・汁物の献立セット",
        vec![
            ("reason", JsonSchema::string("この献立セットを提案する理由")),
            ("main_dish", dish_schema("主菜")),
            ("side_dish", dish_schema("副菜")),
            ("soup", dish_schema("汁物")),
        ],
        &[],
    );
    JsonSchema::object(
        "最終的な献立提案。質問の場合はnullになります。",
        vec![
            ("type", JsonSchema::string("常に \"suggestion\"").with_enum(&["suggestion"])),
            ("message", JsonSchema::string("提案の際の冒頭メッセージ")),
            ("menus", JsonSchema::array(menu_set, "提案する献立セットのリスト（1つ以上）")),
        ],
        &["type"],
    )
}

/// Schema of the nested reply: exactly one of `question` or `suggestion`.
pub fn reply_json_schema() -> JsonSchema {
    JsonSchema::object(
        "AIの応答。質問か提案のどちらか一方だけを含みます。",
        vec![("question", question_schema()), ("suggestion", suggestion_schema())],
        &["question", "suggestion"],
    )
}

/// Instruction text embedding the reply schema, sent with every model call.
pub fn format_instructions() -> String {
    let schema = serde_json::to_string(&reply_json_schema()).unwrap_or_default();
    format!(
        "The output must be a single JSON instance that conforms to the JSON schema below.

For example, given the schema {{\"properties\": {{\"foo\": {{\"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}
the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema.
The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.

Put the question under the \"question\" key or the suggestion under the \"suggestion\" key, never both.

Here is the output schema:
```
{}
```",
        schema
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_marks_wrapper_keys_optional() {
        let value = serde_json::to_value(reply_json_schema()).unwrap();
        assert_eq!(value["required"], serde_json::json!([]));
        assert!(value["properties"]["question"].is_object());
        assert_eq!(
            value["properties"]["suggestion"]["properties"]["menus"]["items"]["required"],
            serde_json::json!(["reason", "main_dish", "side_dish", "soup"])
        );
    }

    #[test]
    fn question_defaults_free_text_allowed() {
        let value = serde_json::to_value(question_schema()).unwrap();
        assert_eq!(value["properties"]["free_text_allowed"]["default"], Value::Bool(true));
        assert_eq!(value["required"], serde_json::json!(["message", "options"]));
    }

    #[test]
    fn instructions_embed_schema() {
        let text = format_instructions();
        assert!(text.contains("\"main_dish\""));
        assert!(text.contains("free_text_allowed"));
    }
}
