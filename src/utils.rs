pub(crate) enum Status {
    Success(reqwest::Response),
    Failure { status_code: u16, body: String },
}

/// Split a response on its status, reading the raw body text of failures.
///
/// Failure bodies are kept as text; error payloads are not guaranteed to be
/// valid JSON.
pub(crate) async fn split_status(res: reqwest::Response) -> Result<Status, reqwest::Error> {
    let status = res.status();
    if status.is_success() {
        return Ok(Status::Success(res));
    }
    let body = res.text().await?;
    Ok(Status::Failure {
        status_code: status.as_u16(),
        body,
    })
}
