//! services/api/src/adapters/portal.rs
//!
//! This module contains the adapter for the co-op member portal.
//! It implements the `PortalClient` and `PortalSession` ports from the `core` crate
//! on top of a cookie-carrying `reqwest` client.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT},
    redirect::Policy,
    Client, StatusCode,
};
use scraper::{Html, Selector};
use shift_watch_core::{
    error::{AuthError, FetchError},
    ports::{PortalClient, PortalSession},
};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Upper bound on every request made to the portal.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Redirects followed before a request is abandoned.
pub const MAX_REDIRECTS: usize = 5;

/// Name of the portal's hidden anti-forgery field.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that logs into the portal with a fresh cookie jar per session.
#[derive(Clone, Debug)]
pub struct ReqwestPortalClient {
    login_url: Url,
}

impl ReqwestPortalClient {
    /// Creates a new `ReqwestPortalClient` for the given login page.
    pub fn new(login_url: Url) -> Self {
        Self { login_url }
    }

    fn build_client(&self) -> Result<Client, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );

        Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
    }
}

/// Pulls the anti-forgery token out of the login page.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"input[name="{}"]"#, CSRF_FIELD)).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|input| input.value().attr("value"))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Maps a transport failure onto the core's fetch taxonomy.
fn fetch_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_redirect() {
        FetchError::TooManyRedirects
    } else {
        FetchError::Transport(e.to_string())
    }
}

//=========================================================================================
// `PortalClient` Trait Implementation
//=========================================================================================

#[async_trait]
impl PortalClient for ReqwestPortalClient {
    #[instrument(skip(self, password), fields(login_url = %self.login_url))]
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn PortalSession>, AuthError> {
        let client = self
            .build_client()
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?;

        // 1. Load the login page to pick up the token and the session cookie.
        let page_response = client
            .get(self.login_url.clone())
            .send()
            .await
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?;
        if page_response.status() != StatusCode::OK {
            return Err(AuthError::LoginFailed(format!(
                "login page returned HTTP {}",
                page_response.status()
            )));
        }
        let login_page = page_response
            .text()
            .await
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?;
        let token = extract_csrf_token(&login_page).ok_or(AuthError::MissingToken)?;
        debug!("Found anti-forgery token on login page");

        // 2. Submit the credentials the way the browser form does.
        let form = [
            ("username", username),
            ("password", password),
            ("submit", "Log In"),
            (CSRF_FIELD, token.as_str()),
        ];
        let response = client
            .post(self.login_url.clone())
            .header("X-CSRFToken", token.as_str())
            .header(REFERER, self.login_url.as_str())
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(AuthError::LoginFailed(format!(
                "login returned HTTP {}",
                response.status()
            )));
        }

        info!("Logged into portal");
        Ok(Box::new(ReqwestPortalSession { client }))
    }
}

//=========================================================================================
// `PortalSession` Trait Implementation
//=========================================================================================

/// A logged-in session; the cookies live inside the client.
pub struct ReqwestPortalSession {
    client: Client,
}

#[async_trait]
impl PortalSession for ReqwestPortalSession {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::NonSuccessStatus(response.status().as_u16()));
        }
        response.text().await.map_err(fetch_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_read_from_hidden_input() {
        let html = r#"
            <form method="post" action="/services/login/">
              <input type="hidden" name="csrfmiddlewaretoken" value="  abc123XYZ ">
              <input type="text" name="username">
            </form>
        "#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("abc123XYZ"));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        assert_eq!(extract_csrf_token("<form><input name=\"username\"></form>"), None);
        assert_eq!(
            extract_csrf_token(r#"<input type="hidden" name="csrfmiddlewaretoken" value="">"#),
            None
        );
    }

    //-------------------------------------------------------------------------------------
    // Against a local portal
    //-------------------------------------------------------------------------------------

    use axum::{
        extract::Path,
        http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus},
        response::{Html as AxumHtml, Redirect},
        routing::get,
        Form, Router,
    };
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const LOGIN_FORM: &str = r#"
        <form method="post" action="/services/login/">
          <input type="hidden" name="csrfmiddlewaretoken" value="tok123">
          <input type="text" name="username">
          <input type="password" name="password">
        </form>
    "#;

    type Submissions = Arc<Mutex<Vec<(HashMap<String, String>, AxumHeaders)>>>;

    /// Serves `router` on an ephemeral port and returns its root URL.
    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    /// A portal whose login form answers with `post_status` and records every submission.
    fn portal_router(login_page: &'static str, post_status: AxumStatus, submissions: Submissions) -> Router {
        Router::new()
            .route(
                "/services/login/",
                get(move || async move { AxumHtml(login_page) }).post(
                    move |headers: AxumHeaders, Form(form): Form<HashMap<String, String>>| {
                        let submissions = submissions.clone();
                        async move {
                            submissions.lock().unwrap().push((form, headers));
                            (post_status, "welcome")
                        }
                    },
                ),
            )
            .route(
                "/services/shifts/{week}",
                get(|Path(week): Path<u32>| async move {
                    if week == 0 {
                        (AxumStatus::OK, "<div class=\"grid-container\"></div>")
                    } else {
                        (AxumStatus::INTERNAL_SERVER_ERROR, "oops")
                    }
                }),
            )
            .route(
                "/hop/{n}",
                get(|Path(n): Path<u32>| async move { Redirect::temporary(&format!("/hop/{}", n + 1)) }),
            )
    }

    async fn login_against(
        router: Router,
        username: &str,
    ) -> (Url, Result<Box<dyn PortalSession>, AuthError>) {
        let base = serve(router).await;
        let login_url = base.join("services/login/").unwrap();
        let result = ReqwestPortalClient::new(login_url).login(username, "s3cret").await;
        (base, result)
    }

    #[tokio::test]
    async fn login_posts_credentials_with_token_and_headers() {
        let submissions = Submissions::default();
        let router = portal_router(LOGIN_FORM, AxumStatus::OK, submissions.clone());

        let (base, result) = login_against(router, "member42").await;
        assert!(result.is_ok());

        let submissions = submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        let (form, headers) = &submissions[0];
        assert_eq!(form["username"], "member42");
        assert_eq!(form["password"], "s3cret");
        assert_eq!(form["submit"], "Log In");
        assert_eq!(form[CSRF_FIELD], "tok123");
        assert_eq!(headers["x-csrftoken"], "tok123");
        assert_eq!(
            headers["referer"].to_str().unwrap(),
            base.join("services/login/").unwrap().as_str()
        );
    }

    #[tokio::test]
    async fn login_page_without_token_is_missing_token() {
        let submissions = Submissions::default();
        let router = portal_router("<form><input name=\"username\"></form>", AxumStatus::OK, submissions.clone());

        let (_, result) = login_against(router, "member42").await;
        assert!(matches!(result.err(), Some(AuthError::MissingToken)));
        assert!(submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_credentials_fail_login() {
        let router = portal_router(LOGIN_FORM, AxumStatus::FORBIDDEN, Submissions::default());

        let (_, result) = login_against(router, "member42").await;
        assert!(matches!(result.err(), Some(AuthError::LoginFailed(message)) if message.contains("403")));
    }

    #[tokio::test]
    async fn unavailable_login_page_fails_login() {
        // The maintenance page still carries a token; the status alone must decide.
        let router = Router::new().route(
            "/services/login/",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, AxumHtml(LOGIN_FORM)) }),
        );

        let (_, result) = login_against(router, "member42").await;
        assert!(matches!(result.err(), Some(AuthError::LoginFailed(message)) if message.contains("503")));
    }

    #[tokio::test]
    async fn session_fetch_maps_statuses_and_redirect_chains() {
        let router = portal_router(LOGIN_FORM, AxumStatus::OK, Submissions::default());
        let (base, result) = login_against(router, "member42").await;
        let Ok(session) = result else {
            panic!("login should succeed");
        };

        let page = session
            .fetch_document(base.join("services/shifts/0").unwrap().as_str())
            .await
            .unwrap();
        assert!(page.contains("grid-container"));

        let failed = session
            .fetch_document(base.join("services/shifts/1").unwrap().as_str())
            .await;
        assert_eq!(failed, Err(FetchError::NonSuccessStatus(500)));

        let looped = session.fetch_document(base.join("hop/0").unwrap().as_str()).await;
        assert_eq!(looped, Err(FetchError::TooManyRedirects));
    }
}
