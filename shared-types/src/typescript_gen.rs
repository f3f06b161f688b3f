use ts_rs::TS;

/// Every type the widget consumes, in output order
pub const API_TYPE_NAMES: &[&str] = &[
    "StoreId",
    "Question",
    "UpsertQuestionRequest",
    "Answer",
    "SubmitAnswerRequest",
    "Meter",
    "MeterRequest",
    "MeterResponse",
    "ErrorResponse",
    "PingResponse",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;

    let result = match name {
        "StoreId" => StoreId::export_to_string()?,
        "Question" => Question::export_to_string()?,
        "UpsertQuestionRequest" => UpsertQuestionRequest::export_to_string()?,
        "Answer" => Answer::export_to_string()?,
        "SubmitAnswerRequest" => SubmitAnswerRequest::export_to_string()?,
        "Meter" => Meter::export_to_string()?,
        "MeterRequest" => MeterRequest::export_to_string()?,
        "MeterResponse" => MeterResponse::export_to_string()?,
        "ErrorResponse" => ErrorResponse::export_to_string()?,
        "PingResponse" => PingResponse::export_to_string()?,
        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}
