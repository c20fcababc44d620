//! Shared setup: in-memory SQLite schema, seeded reference data and a router

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use entity::{
    contact, fee, member, member_trip, non_member, non_member_trip, role, trip, trip_type, user,
};
use http_body_util::BodyExt;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema, Set,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use tripclub::{
    config::{
        AuthConfig, DatabaseConfig, Environment, PaginationConfig, RateLimitSettings,
        RedisConfig, ServerConfig,
    },
    models::role::Role,
    routes::create_router,
    AppState, Config,
};

pub const ADMIN_EMAIL: &str = "admin@club.pt";
pub const MANAGER_EMAIL: &str = "manager@club.pt";
pub const DESIGNER_EMAIL: &str = "designer@club.pt";
pub const READ_ONLY_EMAIL: &str = "reader@club.pt";
pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn token(&self, email: &str, role: Role) -> String {
        self.state.jwt_service.generate_token(email, role).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token(ADMIN_EMAIL, Role::Administrator)
    }

    pub fn manager_token(&self) -> String {
        self.token(MANAGER_EMAIL, Role::Manager)
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, Some(token), None)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, Some(token), Some(body)))
            .await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PUT, uri, Some(token), Some(body)))
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, Some(token), None))
            .await
    }

    /// Create a member through the API and return its id
    pub async fn create_member(&self, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/members",
                &self.manager_token(),
                serde_json::json!({
                    "name": name,
                    "address": "Rua Direita 1, Braga",
                    "number": "912345678",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn create_non_member(&self, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/non-members",
                &self.manager_token(),
                serde_json::json!({
                    "name": name,
                    "address": "Avenida Central 10, Guimarães",
                    "landlineNumber": "253123456",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origin: "http://localhost:4200".to_string(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            run_migrations: false,
        },
        redis: RedisConfig {
            url: "redis://127.0.0.1:6379".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_expiration_minutes: 60,
            secure_cookie: false,
            bootstrap_admin: None,
        },
        pagination: PaginationConfig::default(),
        rate_limit: RateLimitSettings::default(),
        environment: Environment::Development,
    }
}

/// Single-connection in-memory database with every table created
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let statements = [
        schema.create_table_from_entity(role::Entity),
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(contact::Entity),
        schema.create_table_from_entity(member::Entity),
        schema.create_table_from_entity(non_member::Entity),
        schema.create_table_from_entity(trip_type::Entity),
        schema.create_table_from_entity(trip::Entity),
        schema.create_table_from_entity(fee::Entity),
        schema.create_table_from_entity(member_trip::Entity),
        schema.create_table_from_entity(non_member_trip::Entity),
    ];
    for statement in &statements {
        db.execute(backend.build(statement)).await.unwrap();
    }

    seed(&db).await;
    db
}

async fn seed(db: &DatabaseConnection) {
    for role in Role::ALL {
        role::ActiveModel {
            code: Set(role.as_str().to_string()),
            name: Set(role.as_str().to_lowercase()),
            description: Set(None),
        }
        .insert(db)
        .await
        .unwrap();
    }

    let now = OffsetDateTime::now_utc();
    for (code, name) in [("ASSOCIATION", "Associação"), ("CITY_COUNCIL", "Câmara Municipal")] {
        trip_type::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap();
    }

    // Low cost keeps hashing fast in tests
    let password = bcrypt::hash(PASSWORD, 4).unwrap();
    for (email, name, role) in [
        (ADMIN_EMAIL, "Admin", Role::Administrator),
        (MANAGER_EMAIL, "Manuela", Role::Manager),
        (DESIGNER_EMAIL, "Diogo", Role::Designer),
        (READ_ONLY_EMAIL, "Rita", Role::ReadOnly),
    ] {
        user::ActiveModel {
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            password: Set(password.clone()),
            role_code: Set(role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }
}

pub async fn setup_with_config(config: Config) -> TestApp {
    let db = test_db().await;
    let state = AppState::from_parts(db, config).unwrap();
    let router = create_router(state.clone());
    TestApp { state, router }
}

pub async fn setup() -> TestApp {
    setup_with_config(test_config()).await
}
