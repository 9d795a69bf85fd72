use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Result, TimetableError};
use crate::http::RequestLogMiddleware;
use crate::model::api_error::decode_payload;
use crate::model::course_entry::{CourseEntry, SharedLecturersResponse};
use crate::model::section::{Section, SectionsResponse};
use crate::model::timetable::Timetable;

const CLIENT_USER_AGENT: &str = concat!("timetable-viewer/", env!("CARGO_PKG_VERSION"));

/// A timetable PDF picked for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Checks the name the same way the upload endpoint does, before touching the network.
    pub fn validate_name(file_name: &str) -> Result<()> {
        if file_name.trim().is_empty() {
            return Err(TimetableError::InvalidUpload("No file selected".to_string()));
        }
        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(TimetableError::InvalidUpload("File must be a PDF".to_string()));
        }
        Ok(())
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::validate_name(&file_name)?;
        if !tokio::fs::try_exists(path).await? {
            return Err(TimetableError::InvalidUpload("No file provided".to_string()));
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(UploadFile { file_name, bytes })
    }
}

/// The backend endpoints the views depend on.
#[async_trait]
pub trait TimetableApi: Send + Sync {
    async fn sections(&self) -> Result<Vec<Section>>;

    async fn shared_lecturers(&self, section: &Section) -> Result<Vec<CourseEntry>>;

    async fn timetable(&self, section: &Section) -> Result<Timetable>;

    async fn upload(&self, file: UploadFile) -> Result<Timetable>;
}

pub struct TimetableClient {
    client: ClientWithMiddleware,
    base_url: Url,
}

impl TimetableClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        let client = ClientBuilder::new(client).with(RequestLogMiddleware).build();

        Ok(TimetableClient {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` + `segments`, each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TimetableError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;
        read_payload(response).await
    }
}

/// Turns a response into `T`, or into [`TimetableError::Api`] for error statuses and
/// `{error}` bodies.
async fn read_payload<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    let value: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            let message = match text.trim() {
                "" => status.canonical_reason().unwrap_or("request failed").to_string(),
                body => body.to_string(),
            };
            return Err(TimetableError::api(status.as_u16(), message));
        }
        Err(err) => return Err(err.into()),
    };

    match decode_payload::<T>(value) {
        Ok(Err(body)) => Err(TimetableError::api(status.as_u16(), body.error)),
        Ok(Ok(_)) | Err(_) if !status.is_success() => Err(TimetableError::api(
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed"),
        )),
        Ok(Ok(payload)) => Ok(payload),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl TimetableApi for TimetableClient {
    async fn sections(&self) -> Result<Vec<Section>> {
        let url = self.endpoint(&["api", "sections"])?;
        let data: SectionsResponse = self.get_json(url).await?;
        Ok(data.sections)
    }

    async fn shared_lecturers(&self, section: &Section) -> Result<Vec<CourseEntry>> {
        let segment = section.to_string();
        let url = self.endpoint(&["api", "shared-lecturers", &segment])?;
        let data: SharedLecturersResponse = self.get_json(url).await?;
        Ok(data.courses)
    }

    async fn timetable(&self, section: &Section) -> Result<Timetable> {
        let segment = section.to_string();
        let url = self.endpoint(&["api", "timetable", &segment])?;
        self.get_json(url).await
    }

    async fn upload(&self, file: UploadFile) -> Result<Timetable> {
        UploadFile::validate_name(&file.file_name)?;
        let url = self.endpoint(&["api", "upload"])?;
        log::info!("uploading {} ({} bytes)", file.file_name, file.bytes.len());

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        read_payload(response).await
    }
}
