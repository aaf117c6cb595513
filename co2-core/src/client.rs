use crate::cicd::Pipeline;
use crate::error::{ApiError, Result};
use crate::historical::{
    decode_records, CicdRecord, CrossProjectRecord, HistoricalQuery, HistoricalView,
    InfrastructureRecord, OperationsRecord, PipelineRecord, SdlcRecord,
};
use crate::operations::{InfrastructureElement, InfrastructureElementDetail};
use crate::project::{Project, ProjectDetail, ProjectFormData, SdlcOverview};
use crate::user_flow::UserFlow;
use crate::date_range::DateRange;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Thin client over the metrics REST API.
///
/// Every call is a single request: no retries, no caching. Non-2xx answers
/// become [`ApiError::Status`] carrying the response body.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, method: &'static str, url: String, request: RequestBuilder) -> Result<String> {
        log::debug!("{} {}", method, url);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                method,
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        let body = self.send("GET", url.clone(), self.http.get(&url).query(query)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    // Projects

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json("projects", &[]).await
    }

    pub async fn get_project(&self, id: u64) -> Result<ProjectDetail> {
        self.get_json(&format!("projects/{}", id), &[]).await
    }

    pub async fn create_project(&self, data: &ProjectFormData) -> Result<Project> {
        let url = self.url("projects");
        let body = self.send("POST", url.clone(), self.http.post(&url).json(data)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn update_project(&self, id: u64, data: &ProjectFormData) -> Result<Project> {
        let url = self.url(&format!("projects/{}", id));
        let body = self.send("PATCH", url.clone(), self.http.patch(&url).json(data)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// The server's error text ends up in [`ApiError::Status::body`].
    pub async fn delete_project(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("projects/{}", id));
        self.send("DELETE", url.clone(), self.http.delete(&url)).await?;
        Ok(())
    }

    /// The server picks the reporting week; no query is sent.
    pub async fn sdlc_overview(&self, project_id: u64) -> Result<SdlcOverview> {
        self.get_json(&format!("projects/{}/sdlc", project_id), &[]).await
    }

    pub async fn user_flows(&self, project_id: u64) -> Result<Vec<UserFlow>> {
        self.get_json(&format!("user-flows/{}", project_id), &[]).await
    }

    // Operations

    pub async fn infrastructure_elements(
        &self,
        tags: &[String],
        match_all: bool,
    ) -> Result<Vec<InfrastructureElement>> {
        self.get_json("operations/infrastructure-elements", &tag_filter(tags, match_all))
            .await
    }

    pub async fn infrastructure_element(&self, id: u64) -> Result<InfrastructureElementDetail> {
        self.get_json(&format!("operations/infrastructure-elements/{}", id), &[])
            .await
    }

    // CI/CD

    pub async fn cicd_pipelines(&self, tags: &[String], match_all: bool) -> Result<Vec<Pipeline>> {
        self.get_json("integration-deployment/cicd-pipelines", &tag_filter(tags, match_all))
            .await
    }

    pub async fn cicd_pipeline(&self, id: u64) -> Result<Pipeline> {
        self.get_json(&format!("integration-deployment/cicd-pipelines/{}", id), &[])
            .await
    }

    // Historical data

    /// Fetch and leniently decode any historical endpoint.
    pub async fn history<R: DeserializeOwned>(&self, query: &HistoricalQuery) -> Result<Vec<R>> {
        let url = self.url(&query.view.path());
        let request = self.http.get(&url).query(&query.query_pairs());
        let body = self.send("GET", url, request).await?;
        decode_records(&body)
    }

    pub async fn cross_project_history(&self, range: &DateRange) -> Result<Vec<CrossProjectRecord>> {
        self.history(&HistoricalQuery::new(HistoricalView::CrossProject, *range))
            .await
    }

    pub async fn sdlc_history(&self, range: &DateRange, tags: &[String]) -> Result<Vec<SdlcRecord>> {
        self.history(&HistoricalQuery::new(HistoricalView::Sdlc, *range).with_tags(tags.to_vec()))
            .await
    }

    pub async fn operations_history(
        &self,
        range: &DateRange,
        tags: &[String],
    ) -> Result<Vec<OperationsRecord>> {
        self.history(&HistoricalQuery::new(HistoricalView::Operations, *range).with_tags(tags.to_vec()))
            .await
    }

    pub async fn cicd_history(&self, range: &DateRange, tags: &[String]) -> Result<Vec<CicdRecord>> {
        self.history(&HistoricalQuery::new(HistoricalView::Cicd, *range).with_tags(tags.to_vec()))
            .await
    }

    pub async fn service_history(
        &self,
        service_id: u64,
        range: &DateRange,
        tags: &[String],
    ) -> Result<Vec<InfrastructureRecord>> {
        self.history(
            &HistoricalQuery::new(HistoricalView::Service(service_id), *range)
                .with_tags(tags.to_vec()),
        )
        .await
    }

    pub async fn pipeline_history(
        &self,
        pipeline_id: u64,
        range: &DateRange,
        tags: &[String],
    ) -> Result<Vec<PipelineRecord>> {
        self.history(
            &HistoricalQuery::new(HistoricalView::Pipeline(pipeline_id), *range)
                .with_tags(tags.to_vec()),
        )
        .await
    }
}

fn tag_filter(tags: &[String], match_all: bool) -> Vec<(&'static str, String)> {
    vec![("tags", tags.join(",")), ("matchAll", match_all.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::windows;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response and hand back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let err = ApiClient::new("localhost:3000").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_list_projects() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"id": 1, "name": "Checkout", "description": "", "tags": [{"id": 1, "name": "shop"}]}]"#,
        )
        .await;
        let client = ApiClient::new(&base).unwrap();
        let projects = client.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].tag_names(), vec!["shop"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /projects HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_update_project_sends_patch_with_body() {
        let (base, server) = serve_once("200 OK", r#"{"id": 4, "name": "Renamed"}"#).await;
        let client = ApiClient::new(&base).unwrap();
        let form = ProjectFormData {
            name: "Renamed".to_string(),
            description: "d".to_string(),
            tags: vec!["a".to_string()],
        };
        let project = client.update_project(4, &form).await.unwrap();
        assert_eq!(project.name, "Renamed");

        let request = server.await.unwrap();
        assert!(request.starts_with("PATCH /projects/4 HTTP/1.1"));
        assert!(request.ends_with(r#"{"name":"Renamed","description":"d","tags":["a"]}"#));
    }

    #[tokio::test]
    async fn test_delete_failure_carries_body() {
        let (base, server) = serve_once("404 Not Found", "Project 8 not found").await;
        let client = ApiClient::new(&base).unwrap();
        let err = client.delete_project(8).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        match err {
            ApiError::Status { method, body, .. } => {
                assert_eq!(method, "DELETE");
                assert_eq!(body, "Project 8 not found");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(server.await.unwrap().starts_with("DELETE /projects/8 "));
    }

    #[tokio::test]
    async fn test_sdlc_overview_sends_no_query() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"projectId": 3, "totalCo2": 812.4, "steps": [{"name": "operations", "totalCo2": 700.0}]}"#,
        )
        .await;
        let client = ApiClient::new(&base).unwrap();
        let overview = client.sdlc_overview(3).await.unwrap();
        assert_eq!(overview.project_id, Some(3));
        assert_eq!(overview.steps[0].name, "operations");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /projects/3/sdlc HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_element_list_sends_tag_filter() {
        let (base, server) = serve_once("200 OK", "[]").await;
        let client = ApiClient::new(&base).unwrap();
        let tags = vec!["shop".to_string(), "eu".to_string()];
        let elements = client.infrastructure_elements(&tags, true).await.unwrap();
        assert!(elements.is_empty());

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "GET /operations/infrastructure-elements?tags=shop%2Ceu&matchAll=true HTTP/1.1"
        ));
    }

    #[tokio::test]
    async fn test_history_skips_bad_records() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[
                {"sdlc_step": "operations", "date": "2024-07-05", "total_co2_consumption": 3.5},
                {"sdlc_step": "operations", "total_co2_consumption": 1.0}
            ]"#,
        )
        .await;
        let client = ApiClient::new(&base).unwrap();
        let records = client
            .sdlc_history(&windows::reporting(), &["shop".to_string()])
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sdlc_step, "operations");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /historical-data/projects/sdlc?startDate=2024-07-04T00%3A00%3A00.000Z"));
        assert!(request.contains("&tags=shop HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let (base, _server) = serve_once("500 Internal Server Error", "boom").await;
        let client = ApiClient::new(&base).unwrap();
        let err = client.cross_project_history(&windows::reporting()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
