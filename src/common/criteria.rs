// src/common/criteria.rs
//
// Consultas por critérios opcionais. Filtro ausente = sem restrição;
// filtros presentes são combinados com AND.

use sqlx::{
    postgres::PgRow, Encode, Executor, FromRow, Postgres, QueryBuilder, Type,
};
use uuid::Uuid;

use crate::common::error::AppError;

pub struct Criteria<'a> {
    qb: QueryBuilder<'a, Postgres>,
    has_where: bool,
}

impl<'a> Criteria<'a> {
    /// `SELECT * FROM <table>`
    pub fn select(table: &str) -> Self {
        Self {
            qb: QueryBuilder::new(format!("SELECT * FROM {}", table)),
            has_where: false,
        }
    }

    /// `SELECT COUNT(*) FROM <table>` (mesmos filtros, para paginação)
    pub fn count(table: &str) -> Self {
        Self {
            qb: QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", table)),
            has_where: false,
        }
    }

    fn clause(&mut self) {
        if self.has_where {
            self.qb.push(" AND ");
        } else {
            self.qb.push(" WHERE ");
            self.has_where = true;
        }
    }

    /// Restrição obrigatória à oficina do chamador.
    pub fn scoped(mut self, garage_id: Uuid) -> Self {
        self.clause();
        self.qb.push("garage_id = ").push_bind(garage_id);
        self
    }

    pub fn eq<T>(mut self, column: &str, value: Option<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.clause();
            self.qb.push(column).push(" = ").push_bind(value);
        }
        self
    }

    /// Substring sem diferenciar maiúsculas (`ILIKE '%valor%'`).
    pub fn contains(mut self, column: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.clause();
            self.qb
                .push(column)
                .push(" ILIKE ")
                .push_bind(format!("%{}%", escape_like(value)));
        }
        self
    }

    /// Intervalo inclusivo; cada limite é opcional.
    pub fn between<T>(mut self, column: &str, lower: Option<T>, upper: Option<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres> + Send,
    {
        if let Some(lower) = lower {
            self.clause();
            self.qb.push(column).push(" >= ").push_bind(lower);
        }
        if let Some(upper) = upper {
            self.clause();
            self.qb.push(column).push(" <= ").push_bind(upper);
        }
        self
    }

    pub fn order_by(mut self, expression: &str) -> Self {
        self.qb.push(" ORDER BY ").push(expression);
        self
    }

    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.qb.push(" LIMIT ").push_bind(limit);
        self.qb.push(" OFFSET ").push_bind(offset);
        self
    }

    pub fn sql(&self) -> &str {
        self.qb.sql()
    }

    pub async fn fetch_all<'e, R, E>(mut self, executor: E) -> Result<Vec<R>, AppError>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self.qb.build_query_as::<R>().fetch_all(executor).await?;
        Ok(rows)
    }

    pub async fn fetch_count<'e, E>(mut self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = self.qb.build_query_scalar::<i64>().fetch_one(executor).await?;
        Ok(total)
    }
}

// `%` e `_` digitados pelo usuário não podem virar curingas.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_keeps_only_the_tenant_scope() {
        let garage = Uuid::new_v4();
        let criteria = Criteria::select("addresses")
            .scoped(garage)
            .eq::<String>("postal_code", None)
            .contains("city", None)
            .contains("state", Some("   "));

        assert_eq!(criteria.sql(), "SELECT * FROM addresses WHERE garage_id = $1");
    }

    #[test]
    fn present_filters_are_anded_in_order() {
        let criteria = Criteria::select("addresses")
            .scoped(Uuid::new_v4())
            .contains("city", Some("pune"))
            .eq("postal_code", Some("411001".to_string()));

        assert_eq!(
            criteria.sql(),
            "SELECT * FROM addresses WHERE garage_id = $1 AND city ILIKE $2 AND postal_code = $3"
        );
    }

    #[test]
    fn unscoped_queries_start_with_where() {
        let criteria = Criteria::select("vehicle_brands").contains("name", Some("Maruti"));

        assert_eq!(criteria.sql(), "SELECT * FROM vehicle_brands WHERE name ILIKE $1");
    }

    #[test]
    fn between_accepts_open_ranges() {
        let criteria = Criteria::select("vehicles")
            .between("manufacture_year", Some(2015), None)
            .order_by("created_at DESC")
            .paginate(20, 40);

        assert_eq!(
            criteria.sql(),
            "SELECT * FROM vehicles WHERE manufacture_year >= $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn count_uses_the_same_filters() {
        let criteria = Criteria::count("staff").scoped(Uuid::new_v4());

        assert_eq!(criteria.sql(), "SELECT COUNT(*) FROM staff WHERE garage_id = $1");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
