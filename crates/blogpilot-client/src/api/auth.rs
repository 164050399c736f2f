use blogpilot_core::models::{
    EmailCheckResponse, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    SignupRequest, SignupResponse,
};

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    pub async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse> {
        self.http.post("/api/auth/signup", req).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        self.http.post("/api/auth/login", req).await
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<MessageResponse> {
        let req = LogoutRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.http.post("/api/auth/logout", &req).await
    }

    pub async fn check_email(&self, email: &str) -> Result<EmailCheckResponse> {
        self.http
            .get("/api/auth/check-email", &[("email", email.trim().to_string())])
            .await
    }
}
