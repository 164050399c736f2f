//! Cache and notification behaviour of the client facade.

use std::sync::Arc;

use assert_json_diff::assert_json_include;
use blogpilot_client::{BlogPilotClient, ClientConfig, ClientError, MemorySessionStorage};
use blogpilot_core::models::{
    BlogTemplateRequest, CreateInquiryRequest, InquiryCategory, NoticeRequest, Platform,
    UpdateProfileRequest,
};
use blogpilot_core::{ClientEvent, Notification, NotificationVariant, Role, Session};
use blogpilot_query::keys;
use serde_json::json;
use tokio::sync::broadcast::Receiver;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = server.uri();
    config.http.retry_min_delay_ms = 1;
    config.http.retry_max_delay_ms = 5;
    config
}

async fn signed_in_client(server: &MockServer) -> BlogPilotClient {
    let session = Session {
        user_id: Some(7),
        email: "kim@example.com".into(),
        username: "kim".into(),
        role: Role::User,
        access_token: "T1".into(),
        refresh_token: Some("R1".into()),
    };
    let storage = Arc::new(MemorySessionStorage::with_session(&session));
    let client = BlogPilotClient::new(test_config(server), storage).unwrap();
    client.init().await;
    client
}

fn notifications(rx: &mut Receiver<ClientEvent>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let ClientEvent::Notification(n) = event {
            out.push(n);
        }
    }
    out
}

fn template_request() -> BlogTemplateRequest {
    BlogTemplateRequest {
        title: "가을 신상".into(),
        categories: vec!["식품".into()],
        platforms: vec![Platform::Naver],
        shop_url: "https://shop.example.com".into(),
        include_images: false,
        image_count: Some(3),
        char_limit: 1500,
        daily_post_time: "09:30".into(),
    }
}

fn template_json() -> serde_json::Value {
    json!({
        "id": 11,
        "title": "가을 신상",
        "categories": ["식품"],
        "platforms": ["naver"],
        "shopUrl": "https://shop.example.com",
        "includeImages": false,
        "charLimit": 1500,
        "dailyPostTime": "09:30:00"
    })
}

fn notices_page_json(titles: &[&str]) -> serde_json::Value {
    let notices: Vec<_> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| json!({"id": i + 1, "title": title, "createdAt": "2024-11-15"}))
        .collect();
    json!({
        "notices": notices,
        "currentPage": 1, "totalPages": 1, "totalElements": titles.len(),
        "size": 10, "first": true, "last": true
    })
}

#[tokio::test]
async fn login_primes_profile_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "kim@example.com", "password": "password1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": 7,
            "email": "kim@example.com",
            "username": "kim",
            "role": "ADMIN",
            "accessToken": "T1",
            "refreshToken": "R1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile/me"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemorySessionStorage::new());
    let client = BlogPilotClient::new(test_config(&server), storage.clone()).unwrap();
    let mut events = client.subscribe();

    client.login(" kim@example.com ", "password1").await.unwrap();

    let profile = client.profile().await.unwrap();
    assert_eq!(profile.username, "kim");
    assert_eq!(profile.role, Role::Admin);
    assert!(client.session().is_admin().await);

    let stored = storage.raw().await.unwrap();
    assert_json_include!(
        actual: stored,
        expected: json!({
            "accessToken": "T1",
            "refreshToken": "R1",
            "userEmail": "kim@example.com",
            "userName": "kim",
            "userRole": "ADMIN"
        })
    );

    let notes = notifications(&mut events);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "로그인 성공");
    assert_eq!(notes[0].variant, NotificationVariant::Success);
}

#[tokio::test]
async fn mutation_invalidates_cached_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notices"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(notices_page_json(&["점검 안내"])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notices"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(notices_page_json(&["신규 기능", "점검 안내"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "title": "신규 기능", "content": "내용", "createdAt": "2024-11-16"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    let mut events = client.subscribe();

    assert_eq!(client.notices(1, 10).await.unwrap().len(), 1);
    // Fresh for 30s, served from cache.
    assert_eq!(client.notices(1, 10).await.unwrap().len(), 1);

    client
        .create_notice(&NoticeRequest {
            title: "신규 기능".into(),
            content: "내용".into(),
            is_important: false,
        })
        .await
        .unwrap();
    assert!(
        client
            .cache()
            .peek(&keys::notices_list(1, 10))
            .unwrap()
            .invalidated
    );

    let page = client.notices(1, 10).await.unwrap();
    assert_eq!(page.items[0].title, "신규 기능");

    let notes = notifications(&mut events);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "공지사항 등록 완료");
}

#[tokio::test]
async fn template_create_refused_when_one_exists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blog-templates/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/blog-templates/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    let mut events = client.subscribe();

    let err = client.create_template(&template_request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let notes = notifications(&mut events);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "템플릿 생성 실패");
    assert_eq!(notes[0].variant, NotificationVariant::Destructive);
}

#[tokio::test]
async fn template_missing_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blog-templates/me"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "템플릿이 없습니다."})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/blog-templates/me"))
        .and(body_json(json!({
            "title": "가을 신상",
            "categories": ["식품"],
            "platforms": ["naver"],
            "shopUrl": "https://shop.example.com",
            "includeImages": false,
            "imageCount": null,
            "charLimit": 1500,
            "dailyPostTime": "09:30:00"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    assert_eq!(client.my_template().await.unwrap(), None);

    let created = client.create_template(&template_request()).await.unwrap();
    assert_eq!(created.id, 11);
    let entry = client.cache().peek(&keys::my_template()).unwrap();
    assert!(!entry.invalidated);
    assert_eq!(entry.data.unwrap()["id"], 11);
}

#[tokio::test]
async fn second_template_create_is_refused_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blog-templates/me"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/blog-templates/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    assert_eq!(client.my_template().await.unwrap(), None);
    let mut events = client.subscribe();

    client.create_template(&template_request()).await.unwrap();
    let err = client.create_template(&template_request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let notes = notifications(&mut events);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].variant, NotificationVariant::Success);
    assert_eq!(notes[1].title, "템플릿 생성 실패");
}

#[tokio::test]
async fn template_create_after_invalidation_checks_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blog-templates/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/blog-templates/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    client
        .cache()
        .prime_query(keys::my_template(), &Option::<serde_json::Value>::None)
        .unwrap();
    client
        .cache()
        .invalidate_queries(&blogpilot_query::KeyFilter::Namespace(blogpilot_core::Resource::Templates));

    let err = client.create_template(&template_request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn failed_profile_edit_rolls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": 7, "email": "kim@example.com", "username": "kim",
            "department": "마케팅", "role": "USER", "tokenUsage": 1200
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/profile/me"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Bad Request"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    let before = client.profile().await.unwrap();
    let snapshot = client.cache().get_query_value(&keys::profile_me());
    let mut events = client.subscribe();

    let err = client
        .update_profile(&UpdateProfileRequest {
            username: "lee".into(),
            department: "영업".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    assert_eq!(client.cache().get_query_value(&keys::profile_me()), snapshot);
    assert_eq!(before.username, "kim");
    assert_eq!(
        client.session().current().await.unwrap().username,
        "kim"
    );

    let notes = notifications(&mut events);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "프로필 수정 실패");
    assert_eq!(notes[0].description.as_deref(), Some("Bad Request"));
}

#[tokio::test]
async fn successful_profile_edit_updates_session_name() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/profile/me"))
        .and(body_json(json!({"username": "lee", "department": "영업"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": 7, "email": "kim@example.com", "username": "lee",
            "department": "영업", "role": "USER", "tokenUsage": 1300
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    let updated = client
        .update_profile(&UpdateProfileRequest {
            username: " lee ".into(),
            department: "영업".into(),
        })
        .await
        .unwrap();
    assert_eq!(updated.token_usage, Some(1300));
    assert_eq!(client.session().current().await.unwrap().username, "lee");
}

#[tokio::test]
async fn invalid_input_never_reaches_the_server() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server).await;
    let mut events = client.subscribe();

    let err = client
        .create_inquiry(&CreateInquiryRequest {
            title: "환불 문의".into(),
            inquiry_category: InquiryCategory::Payment,
            content: "짧음".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());

    let notes = notifications(&mut events);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "입력값을 확인해주세요");
}

#[tokio::test]
async fn taken_email_is_reported_as_destructive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check-email"))
        .and(query_param("email", "kim@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": false, "message": "이미 가입된 이메일입니다."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BlogPilotClient::new(test_config(&server), Arc::new(MemorySessionStorage::new())).unwrap();
    let mut events = client.subscribe();

    let res = client.check_email("kim@example.com").await.unwrap();
    assert!(!res.available);
    assert!(
        client
            .cache()
            .get_query_value(&keys::email_check("kim@example.com"))
            .is_some()
    );

    let notes = notifications(&mut events);
    assert_eq!(notes[0].title, "이미 사용 중인 이메일입니다");
    assert_eq!(notes[0].variant, NotificationVariant::Destructive);
}

#[tokio::test]
async fn logout_clears_cache_even_if_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    client.faqs().await.unwrap();
    assert!(!client.cache().is_empty());

    client.logout().await.unwrap();
    assert!(client.cache().is_empty());
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn answer_invalidates_admin_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/inquiries"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inquiries": [{"id": 3, "title": "결제 오류", "category": "PAYMENT",
                           "status": "PENDING", "createdAt": "2024-11-15"}],
            "currentPage": 1, "totalPages": 1, "totalElements": 1,
            "size": 10, "first": true, "last": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/inquiries/3/answer"))
        .and(body_json(json!({"answerContent": "처리되었습니다."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "title": "결제 오류", "category": "PAYMENT", "content": "결제가 두 번 되었어요",
            "status": "COMPLETED", "createdAt": "2024-11-15",
            "answer": {"answerContent": "처리되었습니다.", "answeredAt": "2024-11-16"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server).await;
    let status = Some(blogpilot_core::models::InquiryStatus::Pending);
    client.admin_inquiries(status, 1, 10).await.unwrap();

    let detail = client.create_answer(3, "  처리되었습니다.  ").await.unwrap();
    assert!(detail.answer.is_some());
    assert!(
        client
            .cache()
            .peek(&keys::admin_inquiries(status, 1, 10))
            .unwrap()
            .invalidated
    );
}
