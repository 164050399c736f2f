//! Read queries bound to the cache, with their staleness policies.

use blogpilot_core::models::{
    BlogTemplateResponse, Blog, DashboardResponse, Faq, InquiryDetail, InquiryListItem,
    InquiryStatus, NoticeDetail, NoticeSummary, Paged, UserDetailResponse,
};
use blogpilot_query::options::{STALE_LONG, STALE_MEDIUM, STALE_SHORT};
use blogpilot_query::{QueryDef, QueryError, QueryKey, QueryOptions, RetryPolicy, keys};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::time::Duration;

use crate::api::ApiClient;
use crate::error::ClientError;

pub const DEFAULT_NOTICE_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MY_INQUIRY_PAGE_SIZE: u32 = 5;
pub const DEFAULT_ADMIN_INQUIRY_PAGE_SIZE: u32 = 10;

type QueryFuture<T> = BoxFuture<'static, blogpilot_query::Result<T>>;

fn run<T, Fut>(fut: Fut) -> QueryFuture<T>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
{
    async move {
        fut.await.map_err(|err| match err {
            ClientError::SessionExpired | ClientError::Validation(_) => QueryError::rejected(err),
            err => QueryError::fetch(err),
        })
    }
    .boxed()
}

fn missing_id<T: Send + 'static>(key: QueryKey) -> QueryFuture<T> {
    async move { Err(QueryError::MissingId(key)) }.boxed()
}

pub struct MyTemplateQuery {
    api: ApiClient,
}

impl MyTemplateQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for MyTemplateQuery {
    type Params = ();
    /// `None` means no template has been created yet.
    type Data = Option<BlogTemplateResponse>;

    fn key(&self, _: &()) -> QueryKey {
        keys::my_template()
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_LONG)
    }

    fn fetch(&self, _: ()) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.my_template().await })
    }
}

pub struct MyBlogsQuery {
    api: ApiClient,
}

impl MyBlogsQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for MyBlogsQuery {
    /// Page and category filter.
    type Params = (u32, Option<String>);
    type Data = Paged<Blog>;

    fn key(&self, (page, category): &Self::Params) -> QueryKey {
        keys::my_blogs(*page, category.as_deref())
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_SHORT).keep_previous_data()
    }

    fn fetch(&self, (page, category): Self::Params) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.my_blogs(page, category.as_deref()).await })
    }
}

pub struct NoticesQuery {
    api: ApiClient,
}

impl NoticesQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for NoticesQuery {
    /// Page and page size.
    type Params = (u32, u32);
    type Data = Paged<NoticeSummary>;

    fn key(&self, (page, size): &Self::Params) -> QueryKey {
        keys::notices_list(*page, *size)
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_SHORT).keep_previous_data()
    }

    fn fetch(&self, (page, size): Self::Params) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.notices(page, size).await })
    }
}

pub struct NoticeDetailQuery {
    api: ApiClient,
}

impl NoticeDetailQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for NoticeDetailQuery {
    type Params = Option<i64>;
    type Data = NoticeDetail;

    fn key(&self, id: &Option<i64>) -> QueryKey {
        keys::notice_detail(*id)
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_MEDIUM)
    }

    fn enabled(&self, id: &Option<i64>) -> bool {
        id.is_some()
    }

    fn fetch(&self, id: Option<i64>) -> QueryFuture<Self::Data> {
        let Some(id) = id else {
            return missing_id(self.key(&None));
        };
        let api = self.api.clone();
        run(async move { api.notice(id).await })
    }
}

pub struct DashboardQuery {
    api: ApiClient,
}

impl DashboardQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for DashboardQuery {
    type Params = ();
    type Data = DashboardResponse;

    fn key(&self, _: &()) -> QueryKey {
        keys::dashboard()
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_MEDIUM).retry(RetryPolicy::exponential(
            2,
            Duration::from_secs(1),
            Duration::from_secs(30),
        ))
    }

    fn fetch(&self, _: ()) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.dashboard().await })
    }
}

pub struct FaqsQuery {
    api: ApiClient,
}

impl FaqsQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for FaqsQuery {
    type Params = ();
    type Data = Vec<Faq>;

    fn key(&self, _: &()) -> QueryKey {
        keys::faqs()
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_LONG)
    }

    fn fetch(&self, _: ()) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.faqs().await })
    }
}

pub struct ProfileQuery {
    api: ApiClient,
}

impl ProfileQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for ProfileQuery {
    type Params = ();
    type Data = UserDetailResponse;

    fn key(&self, _: &()) -> QueryKey {
        keys::profile_me()
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_LONG)
    }

    fn fetch(&self, _: ()) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.my_profile().await })
    }
}

pub struct UserProfileQuery {
    api: ApiClient,
}

impl UserProfileQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for UserProfileQuery {
    type Params = Option<i64>;
    type Data = UserDetailResponse;

    fn key(&self, id: &Option<i64>) -> QueryKey {
        keys::user_profile(*id)
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_LONG)
    }

    fn enabled(&self, id: &Option<i64>) -> bool {
        id.is_some()
    }

    fn fetch(&self, id: Option<i64>) -> QueryFuture<Self::Data> {
        let Some(id) = id else {
            return missing_id(self.key(&None));
        };
        let api = self.api.clone();
        run(async move { api.user_profile(id).await })
    }
}

pub struct MyInquiriesQuery {
    api: ApiClient,
}

impl MyInquiriesQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for MyInquiriesQuery {
    /// Page, page size and status filter.
    type Params = (u32, u32, Option<InquiryStatus>);
    type Data = Paged<InquiryListItem>;

    fn key(&self, (page, size, status): &Self::Params) -> QueryKey {
        keys::my_inquiries(*page, *size, *status)
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_MEDIUM)
    }

    fn fetch(&self, (page, size, status): Self::Params) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.my_inquiries(page, size, status).await })
    }
}

pub struct MyInquiryDetailQuery {
    api: ApiClient,
}

impl MyInquiryDetailQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for MyInquiryDetailQuery {
    type Params = Option<i64>;
    type Data = InquiryDetail;

    fn key(&self, id: &Option<i64>) -> QueryKey {
        keys::my_inquiry_detail(*id)
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_LONG)
    }

    fn enabled(&self, id: &Option<i64>) -> bool {
        id.is_some()
    }

    fn fetch(&self, id: Option<i64>) -> QueryFuture<Self::Data> {
        let Some(id) = id else {
            return missing_id(self.key(&None));
        };
        let api = self.api.clone();
        run(async move { api.my_inquiry(id).await })
    }
}

pub struct AdminInquiriesQuery {
    api: ApiClient,
}

impl AdminInquiriesQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for AdminInquiriesQuery {
    /// Status filter, page and page size.
    type Params = (Option<InquiryStatus>, u32, u32);
    type Data = Paged<InquiryListItem>;

    fn key(&self, (status, page, size): &Self::Params) -> QueryKey {
        keys::admin_inquiries(*status, *page, *size)
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_SHORT).keep_previous_data()
    }

    fn fetch(&self, (status, page, size): Self::Params) -> QueryFuture<Self::Data> {
        let api = self.api.clone();
        run(async move { api.admin_inquiries(status, page, size).await })
    }
}

pub struct AdminInquiryDetailQuery {
    api: ApiClient,
}

impl AdminInquiryDetailQuery {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl QueryDef for AdminInquiryDetailQuery {
    type Params = Option<i64>;
    type Data = InquiryDetail;

    fn key(&self, id: &Option<i64>) -> QueryKey {
        keys::admin_inquiry_detail(*id)
    }

    fn options(&self) -> QueryOptions {
        QueryOptions::new(STALE_LONG)
    }

    fn enabled(&self, id: &Option<i64>) -> bool {
        id.is_some()
    }

    fn fetch(&self, id: Option<i64>) -> QueryFuture<Self::Data> {
        let Some(id) = id else {
            return missing_id(self.key(&None));
        };
        let api = self.api.clone();
        run(async move { api.admin_inquiry(id).await })
    }
}
