//! Multipart extraction for the upload endpoints

use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use reelbox_core::AppError;

/// Fields of an upload form. Only the file is mandatory at this layer.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub bytes: Bytes,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub declared_original_size: Option<String>,
}

impl UploadForm {
    /// Parse `declaredOriginalSize` as a decimal integer, if present.
    pub fn declared_size(&self) -> Result<Option<i64>, AppError> {
        match self.declared_original_size.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
                AppError::Validation(format!(
                    "declaredOriginalSize must be a decimal integer, got '{}'",
                    raw
                ))
            }),
        }
    }
}

/// Read the upload form. Exactly one field named `file` is accepted.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    let mut file_seen = false;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file_seen {
                    return Err(AppError::Validation(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                file_seen = true;
                form.filename = field.file_name().map(|s| s.to_string());
                form.content_type = field.content_type().map(|s| s.to_string());

                let mut buffer = BytesMut::new();
                while let Some(chunk) = field.chunk().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read file data: {}", e))
                })? {
                    buffer.extend_from_slice(&chunk);
                }
                form.bytes = buffer.freeze();
            }
            "title" => form.title = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "declaredOriginalSize" => {
                form.declared_original_size = Some(read_text(field).await?)
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    if !file_seen {
        return Err(AppError::Validation("No file provided".to_string()));
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or("field").to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_size_parsing() {
        let mut form = UploadForm::default();
        assert_eq!(form.declared_size().unwrap(), None);

        form.declared_original_size = Some(" 10485760 ".to_string());
        assert_eq!(form.declared_size().unwrap(), Some(10_485_760));

        form.declared_original_size = Some("ten".to_string());
        assert!(matches!(
            form.declared_size(),
            Err(AppError::Validation(_))
        ));
    }
}
