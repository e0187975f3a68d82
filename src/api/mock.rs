//! Mock transport and session store for isolating controllers in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::api::errors::ApiResult;
use crate::api::{ApiRequest, ApiResponse, ApiTransport};
use crate::domain::types::ApiToken;
use crate::session::{Session, SessionResult, SessionStore};

mock! {
    pub Transport {}

    #[async_trait]
    impl ApiTransport for Transport {
        async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
    }
}

mock! {
    pub Store {}

    impl SessionStore for Store {
        fn current(&self) -> Option<Session>;
        fn token(&self) -> Option<ApiToken>;
        fn store(&self, session: Session) -> SessionResult<()>;
        fn clear(&self) -> SessionResult<()>;
        fn on_unauthorized(&self);
    }
}
