use super::schema::*;

#[derive(Debug)]
#[derive(Queryable)]
pub struct Account {
    pub account_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub active: bool,
}

#[derive(Debug)]
#[derive(Queryable)]
pub struct Scope {
    pub scope_id: i32,
    pub scope_name: String,
    pub scope_description: String,
    pub scope_value: String,
}

#[derive(Debug)]
#[derive(Insertable)]
#[table_name = "scopes"]
pub struct NewScope {
    pub scope_name: String,
    pub scope_description: String,
    pub scope_value: String,
}

#[derive(Debug)]
#[derive(AsChangeset)]
#[table_name = "scopes"]
pub struct ScopeChangeset {
    pub scope_name: Option<String>,
    pub scope_description: Option<String>,
}

/// Row of either `access_tokens` or `refresh_tokens`; both tables share the layout.
#[derive(Debug)]
#[derive(Queryable)]
pub struct Token {
    pub token_id: i32,
    pub token_value: String,
    pub active: bool,
    pub created_at: i64,
    pub expires_at: i64,
    pub account_id: i32,
}
