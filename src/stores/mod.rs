//! Repository layer over the SeaORM entities.
//!
//! Every store function takes `&impl ConnectionTrait`, so callers choose
//! whether it runs on the pool or inside an open transaction.

pub mod avatar_store;
pub mod faculty_store;
pub mod student_store;

pub use avatar_store::AvatarStore;
pub use faculty_store::FacultyStore;
pub use student_store::{StudentStore, StudentWithFaculty};

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

const LIKE_ESCAPE: char = '!';

/// `%token%` with LIKE metacharacters escaped by `!`. Case is left alone;
/// the database folds both sides with `lower()`.
pub(crate) fn like_pattern(token: &str) -> String {
    let mut pattern = String::with_capacity(token.len() + 2);
    pattern.push('%');
    for c in token.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn lower<C: ColumnTrait + 'static>(column: C) -> SimpleExpr {
    Func::lower(Expr::col(column)).into()
}

/// `lower(value)`, folded by the same function as the column side
pub(crate) fn lower_value(value: &str) -> SimpleExpr {
    Func::lower(Expr::val(value)).into()
}

/// `lower(column) LIKE lower('%token%')` for each column, joined with OR.
pub(crate) fn contains_ignore_case<C: ColumnTrait + 'static>(columns: &[C], token: &str) -> Condition {
    let pattern = like_pattern(token);
    let sql = format!("$1 LIKE $2 ESCAPE '{}'", LIKE_ESCAPE);
    columns.iter().fold(Condition::any(), |cond, column| {
        cond.add(Expr::cust_with_exprs(
            sql.as_str(),
            [lower(*column), lower_value(&pattern)],
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50%_Off!"), "%50!%!_Off!!%");
        assert_eq!(like_pattern("Éc"), "%Éc%");
    }
}
