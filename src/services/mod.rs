// Service modules
pub mod contacts;
pub mod fee_service;
pub mod jwt_service;
pub mod member_service;
pub mod non_member_service;
pub mod trip_service;
pub mod trip_type_service;
pub mod user_service;

pub use fee_service::FeeService;
pub use jwt_service::JWTService;
pub use member_service::MemberService;
pub use non_member_service::NonMemberService;
pub use trip_service::TripService;
pub use trip_type_service::TripTypeService;
pub use user_service::UserService;

use sea_orm::sea_query::{Expr, Func, IntoIden, LikeExpr, SimpleExpr};

/// Case-insensitive substring match on a qualified column.
///
/// `%`, `_` and `\` in `text` match literally.
pub(crate) fn contains_insensitive<E, C>(entity: E, column: C, text: &str) -> SimpleExpr
where
    E: IntoIden + 'static,
    C: IntoIden + 'static,
{
    let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((entity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
