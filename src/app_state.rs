use crate::{
    config::Config,
    services::{
        FeeService, JWTService, MemberService, NonMemberService, TripService, TripTypeService,
        UserService,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: Arc<redis::Client>,
    pub jwt_service: Arc<JWTService>,
    pub member_service: Arc<MemberService>,
    pub non_member_service: Arc<NonMemberService>,
    pub fee_service: Arc<FeeService>,
    pub trip_service: Arc<TripService>,
    pub trip_type_service: Arc<TripTypeService>,
    pub user_service: Arc<UserService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        // Connect to database
        let db = sea_orm::Database::connect(&config.database.url).await?;

        Self::from_parts(db, config)
    }

    /// Build the state around an existing connection
    pub fn from_parts(db: DatabaseConnection, config: Config) -> Result<Self, anyhow::Error> {
        // Redis client connects lazily
        let redis = Arc::new(redis::Client::open(config.redis.url.as_str())?);

        let jwt_service = Arc::new(JWTService::new(Arc::new(config.auth.clone())));

        Ok(Self {
            member_service: Arc::new(MemberService::new(db.clone())),
            non_member_service: Arc::new(NonMemberService::new(db.clone())),
            fee_service: Arc::new(FeeService::new(db.clone())),
            trip_service: Arc::new(TripService::new(db.clone())),
            trip_type_service: Arc::new(TripTypeService::new(db.clone())),
            user_service: Arc::new(UserService::new(db.clone(), jwt_service.clone())),
            jwt_service,
            db,
            redis,
            config: Arc::new(config),
        })
    }
}
