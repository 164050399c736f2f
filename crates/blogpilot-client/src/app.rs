//! The client facade used by front ends.
//!
//! Reads go through the shared query cache and report failures only
//! through their return value. Writes validate their input first, run
//! against the API, invalidate the affected resource and emit exactly one
//! notification per outcome.

use blogpilot_core::models::{
    AdminAnswerRequest, Blog, BlogTemplateRequest, BlogTemplateResponse, BlogUpdateRequest,
    CreateInquiryRequest, DashboardResponse, EmailCheckResponse, Faq, InquiryDetail,
    InquiryListItem, InquiryStatus, LoginRequest, LoginResponse, MessageResponse, NoticeDetail,
    NoticeRequest, NoticeSummary, Paged, SignupRequest, SignupResponse, UpdateProfileRequest,
    UserDetailResponse,
};
use blogpilot_core::{
    ClientEvent, EventBroadcaster, Notification, NotificationVariant, Resource, Session,
    ValidationError, validation,
};
use blogpilot_query::{KeyFilter, QueryClient, QueryDef, QueryObserver, keys};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use crate::queries::{
    AdminInquiriesQuery, AdminInquiryDetailQuery, DashboardQuery, FaqsQuery, MyBlogsQuery,
    MyInquiriesQuery, MyInquiryDetailQuery, MyTemplateQuery, NoticeDetailQuery, NoticesQuery,
    ProfileQuery, UserProfileQuery,
};
use crate::session::{FileSessionStorage, SessionContext, SessionStorage};

const INVALID_INPUT_TITLE: &str = "입력값을 확인해주세요";
const TEMPLATE_EXISTS_MESSAGE: &str = "이미 템플릿이 존재합니다. 수정 기능을 이용해주세요.";

/// Notification titles of one mutation.
#[derive(Debug, Clone, Copy)]
struct Titles {
    success: Option<&'static str>,
    description: Option<&'static str>,
    failure: Option<&'static str>,
}

impl Titles {
    const fn new(success: &'static str, failure: &'static str) -> Self {
        Self {
            success: Some(success),
            description: None,
            failure: Some(failure),
        }
    }

    const fn described(success: &'static str, description: &'static str, failure: &'static str) -> Self {
        Self {
            success: Some(success),
            description: Some(description),
            failure: Some(failure),
        }
    }

    const fn failure_only(failure: &'static str) -> Self {
        Self {
            success: None,
            description: None,
            failure: Some(failure),
        }
    }
}

const SIGNUP: Titles = Titles::described(
    "회원가입 완료",
    "환영합니다! 로그인 후 AI 글쓰기 설정을 완료해주세요.",
    "회원가입 실패",
);
const LOGIN_FAILED: &str = "로그인 실패";
const EMAIL_CHECK_FAILED: &str = "이메일 확인 실패";
const TEMPLATE_CREATE: Titles = Titles::described(
    "템플릿 생성 완료",
    "매일 설정한 시간에 글이 자동으로 생성됩니다.",
    "템플릿 생성 실패",
);
const TEMPLATE_UPDATE: Titles = Titles::new("템플릿 수정 완료", "템플릿 수정 실패");
const BLOG_UPDATE: Titles = Titles::new("게시글 수정 완료", "게시글 수정 실패");
const IMAGE_UPLOAD: Titles = Titles::failure_only("이미지 업로드 실패");
const PROFILE_UPDATE: Titles = Titles::new("프로필 수정 완료", "프로필 수정 실패");
const NOTICE_CREATE: Titles = Titles::new("공지사항 등록 완료", "공지사항 등록 실패");
const NOTICE_UPDATE: Titles = Titles::new("공지사항 수정 완료", "공지사항 수정 실패");
const NOTICE_DELETE: Titles = Titles::new("공지사항 삭제 완료", "공지사항 삭제 실패");
const INQUIRY_CREATE: Titles = Titles::described(
    "문의가 접수되었습니다",
    "빠른 시일 내에 답변 드리겠습니다.",
    "문의 등록 실패",
);
const ANSWER_CREATE: Titles = Titles::new("답변이 등록되었습니다", "답변 등록 실패");
const ANSWER_DELETE: Titles = Titles::new("답변이 삭제되었습니다", "답변 삭제 실패");

pub struct BlogPilotClient {
    config: ClientConfig,
    api: ApiClient,
    cache: QueryClient,
    events: EventBroadcaster,
}

impl BlogPilotClient {
    pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        config.validate().map_err(ClientError::Config)?;
        let events = EventBroadcaster::new();
        let session = SessionContext::new(storage, events.clone(), config.api.login_route.clone());
        let http = HttpClient::new(&config, session)?;
        Ok(Self {
            api: ApiClient::new(http),
            cache: QueryClient::new(),
            events,
            config,
        })
    }

    /// Client whose session lives in a JSON file per profile under
    /// `storage.dir`.
    pub fn with_file_storage(config: ClientConfig, profile: &str) -> Result<Self> {
        let dir = config
            .storage_dir()
            .ok_or_else(|| ClientError::Config("cannot determine session storage directory".into()))?;
        let storage = Arc::new(FileSessionStorage::new(dir, profile));
        Self::new(config, storage)
    }

    /// Restore the persisted session. Call once at start-up.
    pub async fn init(&self) -> Option<Session> {
        self.session().init().await
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryClient {
        &self.cache
    }

    pub fn session(&self) -> &SessionContext {
        self.api.session()
    }

    pub fn events(&self) -> &EventBroadcaster {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Observer for a view that keeps one query on screen.
    pub fn observe<Q: QueryDef>(&self, def: Q, params: Q::Params) -> QueryObserver<Q> {
        QueryObserver::new(self.cache.clone(), Arc::new(def), params)
    }

    async fn read<Q: QueryDef>(&self, def: Q, params: Q::Params) -> Result<Q::Data> {
        match self.cache.query(&Arc::new(def), params).await {
            Ok(data) => Ok(data),
            Err(err) => {
                let err = ClientError::from(err);
                if err.is_session_expired() {
                    self.cache.clear();
                }
                Err(err)
            }
        }
    }

    // ===== Reads =====

    pub async fn my_template(&self) -> Result<Option<BlogTemplateResponse>> {
        self.read(MyTemplateQuery::new(self.api.clone()), ()).await
    }

    pub async fn my_blogs(&self, page: u32, category: Option<&str>) -> Result<Paged<Blog>> {
        let category = category.map(str::to_string);
        self.read(MyBlogsQuery::new(self.api.clone()), (page, category))
            .await
    }

    pub async fn notices(&self, page: u32, size: u32) -> Result<Paged<NoticeSummary>> {
        self.read(NoticesQuery::new(self.api.clone()), (page, size)).await
    }

    pub async fn notice(&self, id: Option<i64>) -> Result<NoticeDetail> {
        self.read(NoticeDetailQuery::new(self.api.clone()), id).await
    }

    pub async fn dashboard(&self) -> Result<DashboardResponse> {
        self.read(DashboardQuery::new(self.api.clone()), ()).await
    }

    pub async fn faqs(&self) -> Result<Vec<Faq>> {
        self.read(FaqsQuery::new(self.api.clone()), ()).await
    }

    pub async fn profile(&self) -> Result<UserDetailResponse> {
        self.read(ProfileQuery::new(self.api.clone()), ()).await
    }

    pub async fn user_profile(&self, user_id: Option<i64>) -> Result<UserDetailResponse> {
        self.read(UserProfileQuery::new(self.api.clone()), user_id)
            .await
    }

    pub async fn my_inquiries(
        &self,
        page: u32,
        size: u32,
        status: Option<InquiryStatus>,
    ) -> Result<Paged<InquiryListItem>> {
        self.read(MyInquiriesQuery::new(self.api.clone()), (page, size, status))
            .await
    }

    pub async fn my_inquiry(&self, id: Option<i64>) -> Result<InquiryDetail> {
        self.read(MyInquiryDetailQuery::new(self.api.clone()), id)
            .await
    }

    pub async fn admin_inquiries(
        &self,
        status: Option<InquiryStatus>,
        page: u32,
        size: u32,
    ) -> Result<Paged<InquiryListItem>> {
        self.read(AdminInquiriesQuery::new(self.api.clone()), (status, page, size))
            .await
    }

    pub async fn admin_inquiry(&self, id: Option<i64>) -> Result<InquiryDetail> {
        self.read(AdminInquiryDetailQuery::new(self.api.clone()), id)
            .await
    }

    // ===== Notifications =====

    fn report_failure(&self, title: Option<&'static str>, err: &ClientError) {
        if err.is_session_expired() {
            // The session event already tells the front end what to do.
            self.cache.clear();
            return;
        }
        if let Some(title) = title {
            self.events
                .notify(Notification::failure(title, err.user_message()));
        }
    }

    fn report<T>(&self, titles: Titles, outcome: &Result<T>) {
        match outcome {
            Ok(_) => {
                if let Some(title) = titles.success {
                    self.events.notify(Notification::success(
                        title,
                        titles.description.map(str::to_string),
                    ));
                }
            }
            Err(err) => self.report_failure(titles.failure, err),
        }
    }

    fn reject(&self, err: ValidationError) -> ClientError {
        debug!(field = err.field, "input rejected");
        self.events
            .notify(Notification::failure(INVALID_INPUT_TITLE, err.message.clone()));
        ClientError::Validation(err)
    }

    async fn mutation<T, Fut>(&self, titles: Titles, targets: &[KeyFilter], mutation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let outcome = self.cache.mutate(targets, mutation).await;
        self.report(titles, &outcome);
        outcome
    }

    // ===== Auth =====

    pub async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse> {
        validation::validate_signup(req).map_err(|e| self.reject(e))?;
        self.mutation(SIGNUP, &[], self.api.signup(req)).await
    }

    /// Sign in, persist the session and prime the profile cache from the
    /// login response.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validation::validate_login(&req).map_err(|e| self.reject(e))?;

        let login = match self.api.login(&req).await {
            Ok(login) => login,
            Err(err) => {
                self.report_failure(Some(LOGIN_FAILED), &err);
                return Err(err);
            }
        };
        let session = match self.session().establish(&login).await {
            Ok(session) => session,
            Err(err) => {
                self.report_failure(Some(LOGIN_FAILED), &err);
                return Err(err);
            }
        };

        self.cache.clear();
        if let Err(err) = self
            .cache
            .prime_query(keys::profile_me(), &UserDetailResponse::from(&login))
        {
            warn!(error = %err, "failed to prime profile cache");
        }
        if let Err(err) = self.cache.prime_query(keys::auth_user(), &session) {
            warn!(error = %err, "failed to prime session cache");
        }

        self.events.notify(Notification::success(
            "로그인 성공",
            Some(format!("{}님 환영합니다.", login.username)),
        ));
        Ok(login)
    }

    /// Sign out locally. The server call only revokes the refresh token and
    /// its failure does not keep the user signed in.
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh_token) = self.session().refresh_token().await
            && let Err(err) = self.api.logout(&refresh_token).await
        {
            warn!(error = %err, "server logout failed, clearing local session anyway");
        }
        self.cache.clear();
        self.session().clear().await?;
        self.events.notify(Notification::info(
            "로그아웃",
            Some("안전하게 로그아웃되었습니다.".to_string()),
        ));
        Ok(())
    }

    /// Check whether an email is free to register. The answer is cached
    /// under the email's key for `cache.default_stale_ms`.
    pub async fn check_email(&self, email: &str) -> Result<EmailCheckResponse> {
        let email = email.trim();
        if !validation::is_valid_email(email) {
            return Err(self.reject(ValidationError::new(
                "email",
                "올바른 이메일 형식이 아닙니다.",
            )));
        }

        let key = keys::email_check(email);
        let stale_time = Duration::from_millis(self.config.cache.default_stale_ms);
        let cached = if self.cache.is_stale(&key, stale_time) {
            None
        } else {
            self.cache.get_query_data::<EmailCheckResponse>(&key)
        };
        let res = match cached {
            Some(res) => res,
            None => match self.api.check_email(email).await {
                Ok(res) => {
                    if let Err(err) = self.cache.set_query_data(key, &res) {
                        warn!(error = %err, "failed to cache email check");
                    }
                    res
                }
                Err(err) => {
                    self.report_failure(Some(EMAIL_CHECK_FAILED), &err);
                    return Err(err);
                }
            },
        };

        let description = Some(res.message.clone()).filter(|m| !m.is_empty());
        let notification = if res.available {
            Notification::success("사용 가능한 이메일입니다", description)
        } else {
            Notification {
                variant: NotificationVariant::Destructive,
                ..Notification::info("이미 사용 중인 이메일입니다", description)
            }
        };
        self.events.notify(notification);
        Ok(res)
    }

    // ===== Templates =====

    /// Create the user's template. There is at most one per user, so the
    /// request is refused locally when one is cached or fetched as existing.
    pub async fn create_template(&self, req: &BlogTemplateRequest) -> Result<BlogTemplateResponse> {
        let cleaned = validation::validate_template(req).map_err(|e| self.reject(e))?;

        // Fresh entries are served from the cache; stale or invalidated ones refetch.
        let existing = match self.my_template().await {
            Ok(fetched) => fetched,
            Err(err) => {
                self.report_failure(TEMPLATE_CREATE.failure, &err);
                return Err(err);
            }
        };
        if let Some(template) = existing {
            debug!(template_id = template.id, "template already exists, create refused");
            let err = ClientError::Validation(ValidationError::new("template", TEMPLATE_EXISTS_MESSAGE));
            self.report_failure(TEMPLATE_CREATE.failure, &err);
            return Err(err);
        }

        let created = self
            .mutation(
                TEMPLATE_CREATE,
                &[KeyFilter::Namespace(Resource::Templates)],
                self.api.create_template(&cleaned),
            )
            .await?;
        if let Err(err) = self
            .cache
            .prime_query(keys::my_template(), &Some(&created))
        {
            warn!(error = %err, "failed to cache created template");
        }
        Ok(created)
    }

    pub async fn update_template(&self, req: &BlogTemplateRequest) -> Result<BlogTemplateResponse> {
        let cleaned = validation::validate_template(req).map_err(|e| self.reject(e))?;
        self.mutation(
            TEMPLATE_UPDATE,
            &[KeyFilter::Namespace(Resource::Templates)],
            self.api.update_template(&cleaned),
        )
        .await
    }

    // ===== Blogs and uploads =====

    pub async fn update_blog(&self, id: i64, req: &BlogUpdateRequest) -> Result<Blog> {
        let cleaned = validation::validate_blog_update(req).map_err(|e| self.reject(e))?;
        self.mutation(
            BLOG_UPDATE,
            &[KeyFilter::Namespace(Resource::Blogs)],
            self.api.update_blog(id, &cleaned),
        )
        .await
    }

    /// Upload an image and return its public URL.
    pub async fn upload_image(&self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        if file_name.trim().is_empty() {
            return Err(self.reject(ValidationError::new("fileName", "파일을 선택해주세요.")));
        }
        if !content_type.starts_with("image/") {
            return Err(self.reject(ValidationError::new(
                "contentType",
                "이미지 파일만 업로드할 수 있습니다.",
            )));
        }
        self.mutation(
            IMAGE_UPLOAD,
            &[],
            self.api.upload_file(file_name.trim(), content_type, bytes),
        )
        .await
    }

    // ===== Profile =====

    /// Edit the profile optimistically: the cached profile changes before
    /// the server answers and is restored if the request fails.
    pub async fn update_profile(&self, req: &UpdateProfileRequest) -> Result<UserDetailResponse> {
        let cleaned = validation::validate_profile_update(req).map_err(|e| self.reject(e))?;
        let outcome = self
            .cache
            .mutate_optimistic(
                &keys::profile_me(),
                &KeyFilter::Namespace(Resource::Profile),
                |current: Option<UserDetailResponse>| current.map(|p| p.with_update(&cleaned)),
                self.api.update_profile(&cleaned),
            )
            .await;
        if let Ok(profile) = &outcome
            && let Err(err) = self.session().update_user_name(&profile.username).await
        {
            warn!(error = %err, "failed to persist new user name");
        }
        self.report(PROFILE_UPDATE, &outcome);
        outcome
    }

    // ===== Notices =====

    pub async fn create_notice(&self, req: &NoticeRequest) -> Result<NoticeDetail> {
        validation::validate_notice(req).map_err(|e| self.reject(e))?;
        self.mutation(
            NOTICE_CREATE,
            &[KeyFilter::Namespace(Resource::Notices)],
            self.api.create_notice(req),
        )
        .await
    }

    pub async fn update_notice(&self, id: i64, req: &NoticeRequest) -> Result<MessageResponse> {
        validation::validate_notice(req).map_err(|e| self.reject(e))?;
        self.mutation(
            NOTICE_UPDATE,
            &[KeyFilter::Namespace(Resource::Notices)],
            self.api.update_notice(id, req),
        )
        .await
    }

    pub async fn delete_notice(&self, id: i64) -> Result<MessageResponse> {
        self.mutation(
            NOTICE_DELETE,
            &[KeyFilter::Namespace(Resource::Notices)],
            self.api.delete_notice(id),
        )
        .await
    }

    // ===== Inquiries =====

    pub async fn create_inquiry(&self, req: &CreateInquiryRequest) -> Result<InquiryDetail> {
        let cleaned = validation::validate_inquiry(req).map_err(|e| self.reject(e))?;
        self.mutation(
            INQUIRY_CREATE,
            &[KeyFilter::Namespace(Resource::Inquiries)],
            self.api.create_inquiry(&cleaned),
        )
        .await
    }

    pub async fn create_answer(&self, id: i64, answer_content: &str) -> Result<InquiryDetail> {
        let req = AdminAnswerRequest {
            answer_content: answer_content.trim().to_string(),
        };
        validation::validate_answer(&req).map_err(|e| self.reject(e))?;
        self.mutation(
            ANSWER_CREATE,
            &[KeyFilter::Namespace(Resource::Inquiries)],
            self.api.create_answer(id, &req),
        )
        .await
    }

    pub async fn delete_answer(&self, id: i64) -> Result<MessageResponse> {
        self.mutation(
            ANSWER_DELETE,
            &[KeyFilter::Namespace(Resource::Inquiries)],
            self.api.delete_answer(id),
        )
        .await
    }
}

impl std::fmt::Debug for BlogPilotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogPilotClient")
            .field("base_url", &self.api.http().base_url())
            .field("cache", &self.cache)
            .finish()
    }
}
