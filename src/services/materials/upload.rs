use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::MaterialService;
use crate::config::AppConfig;
use crate::errors::SchoolHubError;
use crate::models::materials::requests::NewMaterial;
use crate::models::materials::responses::MaterialResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::current_user;
use crate::utils::file_magic::content_type_for;
use crate::utils::object_store::{file_extension, object_key, resolve_object_path};
use crate::utils::validate::required_text;
use crate::utils::validate_magic_bytes;

const MAX_TITLE_CHARS: usize = 200;
const MAX_TEXT_FIELD_BYTES: usize = 1024;
const INCOMING_DIR: &str = ".incoming";

/// 已写入临时文件的上传内容
struct IncomingFile {
    temp_path: PathBuf,
    original_name: String,
    extension: String,
    size: i64,
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

fn upload_failed(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, message))
}

async fn discard(incoming: Option<IncomingFile>) {
    if let Some(file) = incoming {
        let _ = fs::remove_file(&file.temp_path).await;
    }
}

// 读取短文本字段
async fn read_text_field(field: &mut Field) -> Result<String, HttpResponse> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| bad_request(ErrorCode::BadRequest, format!("{e}")))?;
        buf.extend_from_slice(&data);
        if buf.len() > MAX_TEXT_FIELD_BYTES {
            return Err(bad_request(ErrorCode::BadRequest, "Form field is too long"));
        }
    }
    String::from_utf8(buf).map_err(|_| bad_request(ErrorCode::BadRequest, "Form field must be UTF-8"))
}

// 将文件字段写入临时目录，同时校验扩展名、文件头和大小
async fn receive_file(
    field: &mut Field,
    original_name: String,
    incoming_dir: &Path,
) -> Result<IncomingFile, HttpResponse> {
    let config = AppConfig::get();

    let extension = file_extension(&original_name).unwrap_or_default();
    if extension.is_empty()
        || !config
            .upload
            .allowed_types
            .iter()
            .any(|t| t.to_lowercase() == extension)
    {
        return Err(bad_request(ErrorCode::FileTypeNotAllowed, "File type not allowed"));
    }

    let temp_path = incoming_dir.join(Uuid::new_v4().to_string());
    let mut f = File::create(&temp_path).await.map_err(|e| {
        tracing::error!("{}", SchoolHubError::file_operation(format!("{e}")));
        upload_failed("Failed to create file")
    })?;

    let mut total_size: usize = 0;
    let mut first_chunk = true;
    while let Some(chunk) = field.next().await {
        let data = match chunk {
            Ok(data) => data,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(bad_request(ErrorCode::FileUploadFailed, format!("{e}")));
            }
        };

        // 首个分块校验文件头
        if first_chunk {
            first_chunk = false;
            if !validate_magic_bytes(&data, &extension) {
                let _ = fs::remove_file(&temp_path).await;
                return Err(bad_request(
                    ErrorCode::FileTypeNotAllowed,
                    "File content does not match its extension",
                ));
            }
        }

        total_size += data.len();
        if total_size > config.upload.max_size {
            let _ = fs::remove_file(&temp_path).await;
            return Err(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit",
            )));
        }

        if let Err(e) = f.write_all(&data).await {
            let _ = fs::remove_file(&temp_path).await;
            tracing::error!("{}", SchoolHubError::file_operation(format!("{e}")));
            return Err(upload_failed("Failed to write file"));
        }
    }

    if let Err(e) = f.flush().await {
        let _ = fs::remove_file(&temp_path).await;
        tracing::error!("{}", SchoolHubError::file_operation(format!("{e}")));
        return Err(upload_failed("Failed to write file"));
    }

    if total_size == 0 {
        let _ = fs::remove_file(&temp_path).await;
        return Err(bad_request(ErrorCode::FileUploadFailed, "Uploaded file is empty"));
    }

    Ok(IncomingFile {
        temp_path,
        original_name,
        extension,
        size: total_size as i64,
    })
}

/// 原子地占用一个尚未存在的对象键并把临时文件移入
///
/// 以 `create_new` 先落一个占位文件，同一毫秒内重名时顺延；
/// 占位成功后只会覆盖自己创建的文件。键非法时返回 `Ok(None)`。
async fn claim_object_path(
    upload_dir: &str,
    student_id: i64,
    file_name: &str,
    mut uploaded_at_ms: i64,
    temp_path: &Path,
) -> std::io::Result<Option<(String, PathBuf)>> {
    loop {
        let key = object_key(student_id, uploaded_at_ms, file_name);
        let Some(path) = resolve_object_path(upload_dir, &key) else {
            return Ok(None);
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => {
                if let Err(e) = fs::rename(temp_path, &path).await {
                    let _ = fs::remove_file(&path).await;
                    return Err(e);
                }
                return Ok(Some((key, path)));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => uploaded_at_ms += 1,
            Err(e) => return Err(e),
        }
    }
}

pub async fn handle_upload(
    service: &MaterialService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let current = match current_user(req) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let incoming_dir = Path::new(upload_dir).join(INCOMING_DIR);

    if let Err(e) = fs::create_dir_all(&incoming_dir).await {
        tracing::error!("{}", SchoolHubError::file_operation(format!("{e}")));
        return Ok(upload_failed("Failed to create upload directory"));
    }

    let mut student_id_raw: Option<String> = None;
    let mut title_raw: Option<String> = None;
    let mut incoming: Option<IncomingFile> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        let result = match name.as_str() {
            "file" => {
                if incoming.is_some() {
                    discard(incoming).await;
                    return Ok(bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }
                match receive_file(&mut field, file_name.unwrap_or_default(), &incoming_dir).await
                {
                    Ok(file) => {
                        incoming = Some(file);
                        Ok(())
                    }
                    Err(response) => Err(response),
                }
            }
            "student_id" => read_text_field(&mut field)
                .await
                .map(|v| student_id_raw = Some(v)),
            "title" => read_text_field(&mut field).await.map(|v| title_raw = Some(v)),
            // 忽略未知字段
            _ => read_text_field(&mut field).await.map(|_| ()),
        };

        if let Err(response) = result {
            discard(incoming).await;
            return Ok(response);
        }
    }

    let Some(file) = incoming else {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    let student_id = match student_id_raw
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
    {
        Some(id) if id > 0 => id,
        _ => {
            discard(Some(file)).await;
            return Ok(bad_request(ErrorCode::BadRequest, "student_id is required"));
        }
    };

    let title = match required_text("Title", title_raw.as_deref().unwrap_or_default(), MAX_TITLE_CHARS)
    {
        Ok(title) => title,
        Err(msg) => {
            discard(Some(file)).await;
            return Ok(bad_request(ErrorCode::MaterialTitleInvalid, msg));
        }
    };

    let storage = service.get_storage(req);
    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            discard(Some(file)).await;
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            discard(Some(file)).await;
            return Ok(upload_failed(format!("Failed to upload file: {e}")));
        }
    }

    // 从临时目录移动到 <student_id>/<unix_ms>-<文件名>
    let claimed = claim_object_path(
        upload_dir,
        student_id,
        &file.original_name,
        chrono::Utc::now().timestamp_millis(),
        &file.temp_path,
    )
    .await;
    let (file_path, target) = match claimed {
        Ok(Some(claimed)) => claimed,
        Ok(None) => {
            discard(Some(file)).await;
            return Ok(upload_failed("Invalid object key"));
        }
        Err(e) => {
            tracing::error!("{}", SchoolHubError::file_operation(format!("{e}")));
            discard(Some(file)).await;
            return Ok(upload_failed("Failed to store file"));
        }
    };

    let new_material = NewMaterial {
        student_id,
        title,
        file_path: file_path.clone(),
        file_name: file.original_name,
        content_type: Some(content_type_for(&file.extension).to_string()),
        size: Some(file.size),
        uploaded_by: Some(current.id()),
    };

    match storage.create_material(new_material).await {
        Ok(material) => {
            tracing::info!(
                "Material {} uploaded for student {} ({} bytes)",
                material.file_path,
                student_id,
                file.size
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                MaterialResponse { material },
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            // target 由本次请求占用，可安全删除
            let _ = fs::remove_file(&target).await;
            Ok(upload_failed(format!("Failed to upload file: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_temp(dir: &Path, body: &[u8]) -> PathBuf {
        let incoming = dir.join(INCOMING_DIR);
        fs::create_dir_all(&incoming).await.unwrap();
        let path = incoming.join(Uuid::new_v4().to_string());
        fs::write(&path, body).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_claim_never_overwrites_same_millisecond() {
        let dir = std::env::temp_dir().join(format!("schoolhub-claim-{}", Uuid::new_v4()));
        let upload_dir = dir.to_string_lossy().to_string();
        let first_temp = write_temp(&dir, b"%PDF-first").await;
        let second_temp = write_temp(&dir, b"%PDF-second").await;

        let (first, second) = futures_util::join!(
            claim_object_path(&upload_dir, 4, "notes.pdf", 1_700, &first_temp),
            claim_object_path(&upload_dir, 4, "notes.pdf", 1_700, &second_temp),
        );
        let (first_key, first_path) = first.unwrap().unwrap();
        let (second_key, second_path) = second.unwrap().unwrap();

        assert_ne!(first_key, second_key);
        let mut keys = vec![first_key, second_key];
        keys.sort();
        assert_eq!(keys, vec!["4/1700-notes.pdf", "4/1701-notes.pdf"]);

        let mut bodies = vec![
            fs::read(&first_path).await.unwrap(),
            fs::read(&second_path).await.unwrap(),
        ];
        bodies.sort();
        assert_eq!(bodies, vec![b"%PDF-first".to_vec(), b"%PDF-second".to_vec()]);
        assert!(!first_temp.exists());
        assert!(!second_temp.exists());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_claim_skips_existing_object() {
        let dir = std::env::temp_dir().join(format!("schoolhub-claim-{}", Uuid::new_v4()));
        let upload_dir = dir.to_string_lossy().to_string();
        fs::create_dir_all(dir.join("9")).await.unwrap();
        fs::write(dir.join("9").join("42-a.txt"), b"kept").await.unwrap();

        let temp = write_temp(&dir, b"new").await;
        let (key, _) = claim_object_path(&upload_dir, 9, "a.txt", 42, &temp)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(key, "9/43-a.txt");
        assert_eq!(fs::read(dir.join("9").join("42-a.txt")).await.unwrap(), b"kept");

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
