use std::convert::Infallible;

use futures::TryStreamExt;
use serde::Serialize;
use warp::Buf;
use warp::http::header::{self, HeaderName, HeaderValue};
use warp::http::StatusCode;
use warp::multipart::{FormData, Part};
use warp::reply::Response;
use warp::Reply;

use super::AppState;
use crate::listone::{self, ListoneError, SyncReport, XLSX_CONTENT_TYPE};

/// Name of the multipart field carrying the workbook
const FILE_FIELD: &str = "file";

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub(super) fn error_reply(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error: message }), status)
        .into_response()
}

/// Turn a pipeline failure into a JSON error; caller mistakes are 400, the rest 500
fn failure_reply(err: &anyhow::Error) -> Response {
    match err.downcast_ref::<ListoneError>() {
        Some(listone_err) => {
            log::warn!("Rejected listone upload: {}", listone_err);
            error_reply(StatusCode::BAD_REQUEST, &listone_err.to_string())
        }
        None => {
            log::error!("Listone sync failed: {:#}", err);
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error while processing the listone",
            )
        }
    }
}

fn xlsx_reply(workbook: Vec<u8>, file_name: &str, report: Option<&SyncReport>) -> Response {
    let mut response = warp::reply::with_header(workbook, header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .into_response();

    let headers = response.headers_mut();
    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
    match HeaderValue::from_str(&disposition) {
        Ok(value) => {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
        Err(_) => {
            log::warn!("Download name '{}' is not a valid header value", file_name);
            headers.insert(
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment"),
            );
        }
    }

    if let Some(report) = report {
        for (name, count) in [
            ("x-listone-created", report.created),
            ("x-listone-updated", report.updated),
            ("x-listone-deleted", report.deleted),
        ] {
            headers.insert(HeaderName::from_static(name), HeaderValue::from(count as u64));
        }
    }

    response
}

/// Body of the `file` part, or `None` when the form has no such part
async fn read_file_part(mut form: FormData) -> Result<Option<Vec<u8>>, warp::Error> {
    // Parts must be consumed in order: a part's body is only readable
    // before the next part is requested.
    while let Some(part) = form.try_next().await? {
        if part.name() != FILE_FIELD {
            continue;
        }

        if let Some(filename) = part.filename() {
            log::debug!("Receiving listone upload '{}'", filename);
        }

        let bytes = read_part_body(part).await?;
        return Ok((!bytes.is_empty()).then_some(bytes));
    }

    Ok(None)
}

async fn read_part_body(part: Part) -> Result<Vec<u8>, warp::Error> {
    part.stream()
        .try_fold(Vec::new(), |mut acc, mut chunk| async move {
            while chunk.has_remaining() {
                let len = chunk.chunk().len();
                acc.extend_from_slice(chunk.chunk());
                chunk.advance(len);
            }
            Ok(acc)
        })
        .await
}

pub async fn sync_listone(form: FormData, state: AppState) -> Result<Response, Infallible> {
    let upload = match read_file_part(form).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                &ListoneError::MissingFile.to_string(),
            ));
        }
        Err(e) => {
            log::warn!("Failed to read multipart upload: {}", e);
            return Ok(error_reply(StatusCode::BAD_REQUEST, "Malformed upload"));
        }
    };

    match listone::run_sync(&state.pool, upload, &state.settings).await {
        Ok(outcome) => Ok(xlsx_reply(
            outcome.workbook,
            &state.settings.download_name,
            Some(&outcome.report),
        )),
        Err(err) => Ok(failure_reply(&err)),
    }
}

pub async fn export_listone(state: AppState) -> Result<Response, Infallible> {
    match listone::export_listone(&state.pool, &state.settings).await {
        Ok((workbook, _)) => Ok(xlsx_reply(workbook, &state.settings.download_name, None)),
        Err(err) => Ok(failure_reply(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListoneSettings;
    use crate::config::repository::test_pool;
    use crate::server::routes;
    use calamine::{Reader, Xlsx};
    use rust_xlsxwriter::Workbook;
    use std::io::Cursor;

    const BOUNDARY: &str = "listone-test-boundary";

    async fn state() -> AppState {
        AppState {
            pool: test_pool().await,
            settings: ListoneSettings::default(),
        }
    }

    fn quotations(rows: &[(i64, &str, &str)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Quotazioni").unwrap();
        sheet.write_string(1, 0, "Id").unwrap();
        for (idx, (id, role, name)) in rows.iter().enumerate() {
            let row = idx as u32 + 2;
            sheet.write_number(row, 0, *id as f64).unwrap();
            sheet.write_string(row, 1, *role).unwrap();
            sheet.write_string(row, 3, *name).unwrap();
            sheet.write_string(row, 4, "Bologna").unwrap();
            sheet.write_number(row, 5, 10).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    fn multipart_body(field: &str, payload: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"listone.xlsx\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY,
            f = field
        )
        .into_bytes();
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> warp::test::RequestBuilder {
        warp::test::request()
            .method("POST")
            .path("/api/admin/sync-listone")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(body)
    }

    fn error_message(body: &[u8]) -> String {
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_sync_returns_workbook() {
        let api = routes(state().await, 1024 * 1024);
        let body = multipart_body("file", &quotations(&[(1, "P", "Skorupski"), (2, "A", "Castro")]));

        let res = upload_request(body).reply(&api).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], XLSX_CONTENT_TYPE);
        assert_eq!(
            res.headers()["content-disposition"],
            "attachment; filename=\"Listone_Aggiornato.xlsx\""
        );
        assert_eq!(res.headers()["x-listone-created"], "2");
        assert_eq!(res.headers()["x-listone-deleted"], "0");

        let mut workbook = Xlsx::new(Cursor::new(res.body().to_vec())).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Listone Aggiornato".to_string()]);
        let range = workbook.worksheet_range("Listone Aggiornato").unwrap();
        assert_eq!(range.height(), 3);
    }

    #[tokio::test]
    async fn test_missing_file_part_is_bad_request() {
        let api = routes(state().await, 1024 * 1024);
        let body = multipart_body("document", &quotations(&[(1, "P", "Skorupski")]));

        let res = upload_request(body).reply(&api).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(res.body()), "No file uploaded");
    }

    #[tokio::test]
    async fn test_invalid_workbook_is_bad_request() {
        let api = routes(state().await, 1024 * 1024);
        let body = multipart_body("file", b"this is not a spreadsheet");

        let res = upload_request(body).reply(&api).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(res.body()).starts_with("Invalid Excel workbook"));
    }

    #[tokio::test]
    async fn test_empty_listone_is_bad_request() {
        let api = routes(state().await, 1024 * 1024);
        let body = multipart_body("file", &quotations(&[]));

        let res = upload_request(body).reply(&api).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(res.body()), "The listone contains no player rows");
    }

    #[tokio::test]
    async fn test_export_without_upload() {
        let api = routes(state().await, 1024 * 1024);

        let res = warp::test::request()
            .method("GET")
            .path("/api/admin/listone")
            .reply(&api)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], XLSX_CONTENT_TYPE);
        assert!(res.headers().get("x-listone-created").is_none());
    }

    #[tokio::test]
    async fn test_upload_page_and_health() {
        let api = routes(state().await, 1024 * 1024);

        let page = warp::test::request()
            .path("/admin/manage/listone")
            .reply(&api)
            .await;
        assert_eq!(page.status(), StatusCode::OK);
        let html = String::from_utf8(page.body().to_vec()).unwrap();
        assert!(html.contains("/api/admin/sync-listone"));

        let health = warp::test::request().path("/health").reply(&api).await;
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(health.body().as_ref(), b"ok");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let api = routes(state().await, 64);
        let body = multipart_body("file", &quotations(&[(1, "P", "Skorupski")]));

        let res = upload_request(body).reply(&api).await;

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error_message(res.body()), "Uploaded file is too large");
    }

    #[tokio::test]
    async fn test_database_failure_is_internal_error() {
        let state = state().await;
        state.pool.close().await;
        let api = routes(state, 1024 * 1024);
        let body = multipart_body("file", &quotations(&[(1, "P", "Skorupski")]));

        let res = upload_request(body).reply(&api).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(res.body()), "Error while processing the listone");
    }

    #[tokio::test]
    async fn test_export_database_failure_is_internal_error() {
        let state = state().await;
        state.pool.close().await;
        let api = routes(state, 1024 * 1024);

        let res = warp::test::request()
            .method("GET")
            .path("/api/admin/listone")
            .reply(&api)
            .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.headers()["content-type"], "application/json");
        assert_eq!(error_message(res.body()), "Error while processing the listone");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let api = routes(state().await, 1024 * 1024);

        let res = warp::test::request().path("/nope").reply(&api).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
