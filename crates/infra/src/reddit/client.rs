use std::collections::VecDeque;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, from_str};

use flairbot_core::domain::comments::{Comment, MoreComments, Submission};

use super::forest::graft;
use super::listing::{check_api_errors, parse_more_children, parse_submission};
use super::{ForumClient, RedditError};

const AUTH_ENDPOINT: &str = "https://www.reddit.com/api/v1/access_token";
const API_ENDPOINT: &str = "https://oauth.reddit.com";
const LISTING_LIMIT: &str = "500";
const MORE_CHILDREN_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    api_endpoint: String,
    access_token: String,
    user_agent: String,
}

impl RedditClient {
    pub async fn login(
        http: reqwest::Client,
        credentials: &Credentials,
    ) -> Result<Self, RedditError> {
        Self::login_with_endpoints(http, credentials, AUTH_ENDPOINT, API_ENDPOINT).await
    }

    pub async fn login_with_endpoints(
        http: reqwest::Client,
        credentials: &Credentials,
        auth_endpoint: &str,
        api_endpoint: &str,
    ) -> Result<Self, RedditError> {
        let response = http
            .post(auth_endpoint)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header("User-Agent", &credentials.user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RedditError::Auth(format!(
                "token request failed: status {status}, body {body}"
            )));
        }
        let payload: TokenResponse = from_str(&body)
            .map_err(|_| RedditError::InvalidResponse(format!("invalid token payload: {body}")))?;
        if let Some(error) = payload.error {
            return Err(RedditError::Auth(error));
        }
        let token = payload.access_token.unwrap_or_default();
        if token.trim().is_empty() {
            return Err(RedditError::Auth("missing token".to_string()));
        }
        Ok(Self {
            http,
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            access_token: token,
            user_agent: credentials.user_agent.clone(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, RedditError> {
        let response = self
            .http
            .get(format!("{}{path}", self.api_endpoint))
            .bearer_auth(&self.access_token)
            .header("User-Agent", &self.user_agent)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Value, RedditError> {
        let response = self
            .http
            .post(format!("{}{path}", self.api_endpoint))
            .bearer_auth(&self.access_token)
            .header("User-Agent", &self.user_agent)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        let payload: Value = response.json().await?;
        check_api_errors(&payload)?;
        Ok(payload)
    }

    async fn fetch_more_children(
        &self,
        link_fullname: &str,
        children: &[String],
    ) -> Result<(Vec<Comment>, Vec<MoreComments>), RedditError> {
        let mut comments = Vec::new();
        let mut more = Vec::new();
        for chunk in children.chunks(MORE_CHILDREN_BATCH_SIZE) {
            let ids = chunk.join(",");
            let payload = self
                .get_json(
                    "/api/morechildren",
                    &[
                        ("api_type", "json"),
                        ("link_id", link_fullname),
                        ("children", ids.as_str()),
                        ("limit_children", "false"),
                        ("raw_json", "1"),
                    ],
                )
                .await?;
            let (chunk_comments, chunk_more) = parse_more_children(payload)?;
            comments.extend(chunk_comments);
            more.extend(chunk_more);
        }
        Ok((comments, more))
    }

    async fn fetch_thread(
        &self,
        submission_id: &str,
        parent_id: &str,
    ) -> Result<(Vec<Comment>, Vec<MoreComments>), RedditError> {
        let path = format!("/comments/{submission_id}");
        let payload = self
            .get_json(
                &path,
                &[("comment", parent_id), ("limit", LISTING_LIMIT), ("raw_json", "1")],
            )
            .await?;
        let thread = parse_submission(payload)?;
        let replies = thread
            .comments
            .into_iter()
            .find(|comment| comment.id == parent_id)
            .map(|comment| comment.replies)
            .unwrap_or_default();
        Ok((replies, thread.more))
    }
}

#[async_trait]
impl ForumClient for RedditClient {
    async fn fetch_submission(&self, submission_id: &str) -> Result<Submission, RedditError> {
        let path = format!("/comments/{submission_id}");
        let payload = self
            .get_json(&path, &[("limit", LISTING_LIMIT), ("raw_json", "1")])
            .await?;
        parse_submission(payload)
    }

    async fn expand_all_comments(&self, submission: &mut Submission) -> Result<(), RedditError> {
        let link_fullname = submission.fullname();
        let mut pending: VecDeque<MoreComments> = submission.more.drain(..).collect();
        while let Some(more) = pending.pop_front() {
            let (incoming, discovered) = if more.is_continue_thread() {
                let Some(parent_id) = more.parent_id.strip_prefix("t1_") else {
                    continue;
                };
                self.fetch_thread(&submission.id, parent_id).await?
            } else {
                self.fetch_more_children(&link_fullname, &more.children).await?
            };
            graft(&mut submission.comments, &link_fullname, incoming);
            pending.extend(discovered);
        }
        Ok(())
    }

    async fn set_flair(
        &self,
        community: &str,
        author: &str,
        text: &str,
        css_class: &str,
    ) -> Result<(), RedditError> {
        let path = format!("/r/{community}/api/flair");
        self.post_form(
            &path,
            &[
                ("api_type", "json"),
                ("name", author),
                ("text", text),
                ("css_class", css_class),
            ],
        )
        .await?;
        Ok(())
    }

    async fn post_reply(&self, comment: &Comment, text: &str) -> Result<(), RedditError> {
        let thing_id = comment.fullname();
        self.post_form(
            "/api/comment",
            &[
                ("api_type", "json"),
                ("thing_id", thing_id.as_str()),
                ("text", text),
            ],
        )
        .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::{Credentials, RedditClient};
    use crate::reddit::{ForumClient, RedditError};

    type RequestLog = Arc<Mutex<Vec<String>>>;

    fn credentials() -> Credentials {
        Credentials {
            client_id: "fake app key".to_string(),
            client_secret: "fake app secret".to_string(),
            username: "SwapBot".to_string(),
            password: "fake password".to_string(),
            user_agent: "SwapBot".to_string(),
        }
    }

    async fn spawn_server(route: fn(&str) -> Value) -> (String, RequestLog) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let log: RequestLog = Arc::default();
        let server_log = log.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                respond(stream, route, &server_log).await;
            }
        });
        (base, log)
    }

    async fn respond(mut stream: TcpStream, route: fn(&str) -> Value, log: &RequestLog) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            let read = stream.read(&mut chunk).await.unwrap();
            if read == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let body_len = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + body_len {
            let read = stream.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);
        }

        let request_line = head.lines().next().unwrap_or_default().to_string();
        log.lock().unwrap().push(request_line.clone());
        let body = route(&request_line).to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
    }

    async fn login(base: &str) -> Result<RedditClient, RedditError> {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        RedditClient::login_with_endpoints(
            http,
            &credentials(),
            &format!("{base}/api/v1/access_token"),
            base,
        )
        .await
    }

    fn comment(id: &str, parent: &str, author: &str, replies: Value) -> Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "parent_id": parent,
                "body": "https://www.heatware.com/u/12345",
                "author": author,
                "author_flair_text": null,
                "author_flair_css_class": null,
                "replies": replies
            }
        })
    }

    fn listing(children: Vec<Value>) -> Value {
        json!({ "kind": "Listing", "data": { "children": children } })
    }

    fn more(parent: &str, children: &[&str]) -> Value {
        json!({ "kind": "more", "data": { "id": "m", "parent_id": parent, "count": children.len(), "children": children } })
    }

    fn thread_route(request_line: &str) -> Value {
        if request_line.starts_with("POST /api/v1/access_token") {
            return json!({ "access_token": "token-123", "token_type": "bearer" });
        }
        if request_line.contains("comment=r1") {
            return json!([
                listing(vec![json!({ "kind": "t3", "data": { "id": "abc" } })]),
                listing(vec![comment(
                    "r1",
                    "t1_c1",
                    "bob",
                    listing(vec![comment(
                        "r1a",
                        "t1_r1",
                        "erin",
                        listing(vec![comment("r1b", "t1_r1a", "frank", json!(""))]),
                    )]),
                )]),
            ]);
        }
        if request_line.starts_with("GET /comments/abc") {
            return json!([
                listing(vec![json!({ "kind": "t3", "data": { "id": "abc", "title": "Heatware thread" } })]),
                listing(vec![
                    comment(
                        "c1",
                        "t3_abc",
                        "alice",
                        listing(vec![comment(
                            "r1",
                            "t1_c1",
                            "bob",
                            listing(vec![more("t1_r1", &[])]),
                        )]),
                    ),
                    more("t3_abc", &["c2"]),
                    more("t3_abc", &[]),
                ]),
            ]);
        }
        if request_line.contains("children=c2") {
            return json!({ "json": { "errors": [], "data": { "things": [
                comment("c2", "t3_abc", "carol", json!("")),
                more("t1_c2", &["c3"]),
            ] } } });
        }
        if request_line.contains("children=c3") {
            return json!({ "json": { "errors": [], "data": { "things": [
                comment("c3", "t1_c2", "dave", json!("")),
            ] } } });
        }
        json!({ "error": 404 })
    }

    #[tokio::test]
    async fn expand_resolves_every_placeholder() {
        let (base, log) = spawn_server(thread_route).await;
        let client = login(&base).await.unwrap();

        let mut submission = client.fetch_submission("abc").await.unwrap();
        assert_eq!(submission.more.len(), 3);
        client.expand_all_comments(&mut submission).await.unwrap();

        assert!(submission.more.is_empty());
        assert_eq!(submission.list().len(), 6);
        let roots: Vec<&str> = submission.root_comments().map(|c| c.id.as_str()).collect();
        assert_eq!(roots, vec!["c1", "c2"]);

        let r1 = &submission.comments[0].replies[0];
        assert_eq!(r1.id, "r1");
        assert_eq!(r1.replies[0].id, "r1a");
        assert_eq!(r1.replies[0].replies[0].id, "r1b");
        assert!(!r1.replies[0].is_root);

        let c2 = &submission.comments[1];
        assert_eq!(c2.author.as_deref(), Some("carol"));
        assert_eq!(c2.replies[0].id, "c3");

        let requests = log.lock().unwrap().clone();
        assert_eq!(
            requests
                .iter()
                .filter(|line| line.starts_with("GET /api/morechildren"))
                .count(),
            2
        );
        assert_eq!(
            requests
                .iter()
                .filter(|line| line.contains("comment="))
                .count(),
            1
        );
        assert_eq!(requests.len(), 5);
    }

    fn rejected_login_route(_request_line: &str) -> Value {
        json!({ "error": "invalid_grant" })
    }

    #[tokio::test]
    async fn token_error_body_is_auth_failure() {
        let (base, _log) = spawn_server(rejected_login_route).await;

        let result = login(&base).await;

        assert!(matches!(result, Err(RedditError::Auth(message)) if message == "invalid_grant"));
    }
}
