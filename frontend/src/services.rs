// API service layer for communicating with the MaintDesk REST backend
use std::cell::Cell;
use std::rc::Rc;

use gloo::console;
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::callback::Timeout;
use maintdesk_shared::config::ClientConfig;
use maintdesk_shared::session::{handle_unauthorized, KeyValueStorage, SessionError, SessionStore};
use maintdesk_shared::{ApiError, ApiResult};
use serde::{de::DeserializeOwned, Serialize};
use web_sys::AbortController;

use crate::session::{browser_session, BrowserStorage};

// ============================================
// HTTP CLIENT
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn builder(self, url: &str) -> RequestBuilder {
        match self {
            Self::Get => Request::get(url),
            Self::Post => Request::post(url),
            Self::Patch => Request::patch(url),
            Self::Delete => Request::delete(url),
        }
    }
}

/// REST client bound to one base URL and one session store.
///
/// Every request carries `Authorization: Token <token>` when signed in and is
/// aborted after the configured timeout. A 401 wipes the session and sends
/// the browser to the login page.
#[derive(Debug, Clone)]
pub struct ApiClient<S = BrowserStorage> {
    config: ClientConfig,
    session: SessionStore<S>,
}

impl Default for ApiClient<BrowserStorage> {
    fn default() -> Self {
        Self::new(
            ClientConfig::from_override(option_env!("VITE_API_URL")),
            browser_session(),
        )
    }
}

impl<S: KeyValueStorage> ApiClient<S> {
    pub fn new(config: ClientConfig, session: SessionStore<S>) -> Self {
        Self { config, session }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    async fn send(&self, verb: Verb, path: &str, body: Option<String>) -> ApiResult<Response> {
        let url = self.config.url(path);
        let controller = AbortController::new().map_err(|e| ApiError::Client(format!("{e:?}")))?;
        let timed_out = Rc::new(Cell::new(false));
        let _timer = {
            let controller = controller.clone();
            let timed_out = timed_out.clone();
            let millis = u32::try_from(self.config.timeout.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let signal = controller.signal();
        let mut builder = verb.builder(&url).abort_signal(Some(&signal));
        if let Some(authorization) = self.session.authorization_header() {
            builder = builder.header("Authorization", &authorization);
        }
        let request = match body {
            Some(json) => builder.header("Content-Type", "application/json").body(json),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Client(e.to_string()))?;

        let response = match request.send().await {
            Ok(response) => response,
            Err(_) if timed_out.get() => {
                console::warn!(format!("{} {} timed out", verb.as_str(), url));
                return Err(ApiError::Timeout);
            }
            Err(e) => {
                console::error!(format!("{} {} failed: no response ({})", verb.as_str(), url, e));
                return Err(ApiError::Network(e.to_string()));
            }
        };

        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &text);
        match status {
            401 => self.on_unauthorized(),
            403 => console::warn!(format!("{} {}: forbidden", verb.as_str(), url)),
            404 => console::warn!(format!("{} {}: not found", verb.as_str(), url)),
            500..=599 => console::error!(format!("{} {}: server error {}", verb.as_str(), url, status)),
            _ => {}
        }
        Err(error)
    }

    fn on_unauthorized(&self) {
        console::warn!("Session rejected by the server, signing out");
        let location = gloo::utils::window().location();
        let path = location.pathname().unwrap_or_default();
        if let Some(target) = handle_unauthorized(&self.session, &path) {
            if let Err(e) = location.set_href(target) {
                console::error!(format!("Redirect to {target} failed: {e:?}"));
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        // 204 and other empty bodies decode as `null`
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn encode<B: Serialize>(body: &B) -> ApiResult<String> {
        serde_json::to_string(body).map_err(|e| ApiError::Client(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(Verb::Get, path, None).await?;
        Self::decode(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let response = self.send(Verb::Post, path, Some(Self::encode(body)?)).await?;
        Self::decode(response).await
    }

    pub async fn post_empty(&self, path: &str) -> ApiResult<()> {
        self.send(Verb::Post, path, None).await.map(|_| ())
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let response = self.send(Verb::Patch, path, Some(Self::encode(body)?)).await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(Verb::Delete, path, None).await.map(|_| ())
    }

    /// POST `body` and return the raw response bytes.
    pub async fn download<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Vec<u8>> {
        let response = self.send(Verb::Post, path, Some(Self::encode(body)?)).await?;
        response
            .binary()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn api() -> ApiClient {
    ApiClient::default()
}

fn session_error(e: SessionError) -> ApiError {
    ApiError::Client(e.to_string())
}

// ============================================
// AUTH SERVICE
// ============================================

pub mod auth {
    use super::*;
    use maintdesk_shared::session::Session;
    use maintdesk_shared::{AuthResponse, LoginRequest, RegisterRequest, User};

    fn remember(client: &ApiClient, response: &AuthResponse) -> ApiResult<()> {
        client
            .session()
            .save(&Session {
                token: response.token.clone(),
                refresh_token: response.refresh_token.clone(),
                user: response.user.clone(),
            })
            .map_err(session_error)
    }

    pub async fn login(username: &str, password: &str) -> ApiResult<AuthResponse> {
        let client = api();
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = client.post("/auth/login/", &request).await?;
        remember(&client, &response)?;
        Ok(response)
    }

    pub async fn register(request: &RegisterRequest) -> ApiResult<AuthResponse> {
        let client = api();
        let response: AuthResponse = client.post("/auth/register/", request).await?;
        remember(&client, &response)?;
        Ok(response)
    }

    /// Tell the server, then forget the session whatever it answered.
    pub async fn logout() {
        let client = api();
        if let Err(e) = client.post_empty("/auth/logout/").await {
            console::warn!(format!("Logout request failed: {e}"));
        }
        client.session().clear();
    }

    /// Fetch the signed-in user and refresh the cached copy.
    pub async fn profile() -> ApiResult<User> {
        let client = api();
        let user: User = client.get("/auth/profile/").await?;
        client.session().replace_user(&user).map_err(session_error)?;
        Ok(user)
    }

    /// The persisted session, if any. A corrupt session is discarded.
    pub fn current_session() -> Option<Session> {
        let session = browser_session();
        match session.load() {
            Ok(current) => current,
            Err(e) => {
                console::error!(format!("Discarding stored session: {e}"));
                session.clear();
                None
            }
        }
    }
}

// ============================================
// TICKETS SERVICE
// ============================================

pub mod tickets {
    use super::*;
    use maintdesk_shared::error::FieldError;
    use maintdesk_shared::query::{with_query, TicketFilters};
    use maintdesk_shared::workflow::{self, Actor};
    use maintdesk_shared::{
        Comment, CreateTicket, Feedback, NewComment, NewFeedback, Page, Ticket, TicketUpdate,
    };

    pub async fn list(filters: &TicketFilters) -> ApiResult<Page<Ticket>> {
        api().get(&with_query("/tickets/", &filters.query_pairs())).await
    }

    pub async fn get(id: i64) -> ApiResult<Ticket> {
        api().get(&format!("/tickets/{id}/")).await
    }

    pub async fn create(input: &CreateTicket) -> ApiResult<Ticket> {
        api().post("/tickets/", input).await
    }

    pub async fn update(id: i64, update: &TicketUpdate) -> ApiResult<Ticket> {
        api().patch(&format!("/tickets/{id}/"), update).await
    }

    pub async fn delete(id: i64) -> ApiResult<()> {
        api().delete(&format!("/tickets/{id}/")).await
    }

    /// Check `update` against the workflow rules, then PATCH what remains.
    pub async fn transition(
        ticket: &Ticket,
        actor: &Actor,
        update: TicketUpdate,
        confirmed: bool,
    ) -> ApiResult<Ticket> {
        let planned = workflow::plan_update(ticket, actor, update, confirmed)
            .map_err(|e| ApiError::Client(e.to_string()))?;
        self::update(ticket.id, &planned).await
    }

    /// Assign `technician_id`. Closed tickets are returned untouched.
    pub async fn assign(ticket: &Ticket, technician_id: i64) -> ApiResult<Ticket> {
        let update = workflow::assignment_update(ticket, technician_id);
        if update.is_empty() {
            return Ok(ticket.clone());
        }
        self::update(ticket.id, &update).await
    }

    pub async fn comments(id: i64) -> ApiResult<Vec<Comment>> {
        api().get(&format!("/tickets/{id}/comments/")).await
    }

    pub async fn add_comment(id: i64, text: &str) -> ApiResult<Comment> {
        let body = NewComment {
            text: text.trim().to_string(),
        };
        api().post(&format!("/tickets/{id}/comments/"), &body).await
    }

    pub async fn feedback(id: i64) -> ApiResult<Vec<Feedback>> {
        api().get(&format!("/tickets/{id}/feedback/")).await
    }

    /// Ratings outside 1..=5 are rejected without a request.
    pub async fn add_feedback(id: i64, rating: i64, comment: &str) -> ApiResult<Feedback> {
        let rating = workflow::validate_rating(rating).map_err(|e| {
            ApiError::Validation(vec![FieldError {
                field: "rating".to_string(),
                message: e.to_string(),
            }])
        })?;
        let comment = comment.trim();
        let body = NewFeedback {
            rating,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        };
        api().post(&format!("/tickets/{id}/feedback/"), &body).await
    }
}

// ============================================
// USERS SERVICE
// ============================================

pub mod users {
    use super::*;
    use maintdesk_shared::query::{with_query, UserQuery};
    use maintdesk_shared::{NewUser, Page, User, UserUpdate};

    pub async fn list(query: &UserQuery) -> ApiResult<Page<User>> {
        api().get(&with_query("/users/", &query.query_pairs())).await
    }

    pub async fn get(id: i64) -> ApiResult<User> {
        api().get(&format!("/users/{id}/")).await
    }

    pub async fn me() -> ApiResult<User> {
        api().get("/users/me/").await
    }

    pub async fn create(input: &NewUser) -> ApiResult<User> {
        api().post("/users/", input).await
    }

    pub async fn update(id: i64, update: &UserUpdate) -> ApiResult<User> {
        api().patch(&format!("/users/{id}/"), update).await
    }

    pub async fn delete(id: i64) -> ApiResult<()> {
        api().delete(&format!("/users/{id}/")).await
    }
}

pub mod technicians {
    use super::*;
    use maintdesk_shared::query::UserQuery;
    use maintdesk_shared::reference::technicians_from_users;
    use maintdesk_shared::User;

    pub async fn list() -> ApiResult<Vec<User>> {
        let page = super::users::list(&UserQuery::technicians()).await?;
        Ok(technicians_from_users(&page.results))
    }
}

// ============================================
// SECTIONS & FACILITIES SERVICES
// ============================================

pub mod sections {
    use super::*;
    use maintdesk_shared::{ListResponse, Section, SectionInput};

    pub async fn list() -> ApiResult<Vec<Section>> {
        let response: ListResponse<Section> = api().get("/sections/").await?;
        Ok(response.into_items())
    }

    pub async fn get(id: i64) -> ApiResult<Section> {
        api().get(&format!("/sections/{id}/")).await
    }

    pub async fn create(input: &SectionInput) -> ApiResult<Section> {
        api().post("/sections/", input).await
    }

    pub async fn update(id: i64, input: &SectionInput) -> ApiResult<Section> {
        api().patch(&format!("/sections/{id}/"), input).await
    }

    pub async fn delete(id: i64) -> ApiResult<()> {
        api().delete(&format!("/sections/{id}/")).await
    }
}

pub mod facilities {
    use super::*;
    use maintdesk_shared::{Facility, FacilityInput, ListResponse};

    pub async fn list() -> ApiResult<Vec<Facility>> {
        let response: ListResponse<Facility> = api().get("/facilities/").await?;
        Ok(response.into_items())
    }

    pub async fn get(id: i64) -> ApiResult<Facility> {
        api().get(&format!("/facilities/{id}/")).await
    }

    pub async fn create(input: &FacilityInput) -> ApiResult<Facility> {
        api().post("/facilities/", input).await
    }

    pub async fn update(id: i64, input: &FacilityInput) -> ApiResult<Facility> {
        api().patch(&format!("/facilities/{id}/"), input).await
    }

    pub async fn delete(id: i64) -> ApiResult<()> {
        api().delete(&format!("/facilities/{id}/")).await
    }
}

// ============================================
// ANALYTICS SERVICE
// ============================================

pub mod analytics {
    use super::*;
    use maintdesk_shared::{AdminDashboard, TechnicianPerformance, TicketAnalytics};

    pub async fn tickets() -> ApiResult<TicketAnalytics> {
        api().get("/analytics/tickets/").await
    }

    pub async fn technicians() -> ApiResult<Vec<TechnicianPerformance>> {
        api().get("/analytics/technicians/").await
    }

    pub async fn admin_dashboard() -> ApiResult<AdminDashboard> {
        api().get("/analytics/admin-dashboard/").await
    }
}

// ============================================
// REPORTS SERVICE
// ============================================

pub mod reports {
    use super::*;
    use chrono::Utc;
    use maintdesk_shared::reports::report_filename;
    use maintdesk_shared::{ReportRequest, ReportType};
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    pub async fn types() -> ApiResult<Vec<ReportType>> {
        api().get("/reports/types/").await
    }

    /// Generate a report and hand it to the browser as a download.
    /// Returns the file name used.
    pub async fn generate(request: &ReportRequest) -> ApiResult<String> {
        let bytes = api().download("/reports/generate/", request).await?;
        let filename = report_filename(&request.report_type, request.format, Utc::now().date_naive());
        save_file(&bytes, request.format.mime_type(), &filename)?;
        console::log!(format!("Downloaded {filename} ({} bytes)", bytes.len()));
        Ok(filename)
    }

    fn save_file(bytes: &[u8], mime: &str, filename: &str) -> ApiResult<()> {
        let js_error = |e: wasm_bindgen::JsValue| ApiError::Client(format!("{e:?}"));

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

        let anchor: HtmlAnchorElement = gloo::utils::document()
            .create_element("a")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ApiError::Client("could not create download link".to_string()))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();
        Url::revoke_object_url(&url).map_err(js_error)
    }
}
