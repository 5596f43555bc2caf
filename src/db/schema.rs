table! {
    accounts (account_id) {
        account_id -> Int4,
        first_name -> Text,
        last_name -> Text,
        username -> Text,
        password_hash -> Text,
        active -> Bool,
    }
}

table! {
    scopes (scope_id) {
        scope_id -> Int4,
        scope_name -> Text,
        scope_description -> Text,
        scope_value -> Text,
    }
}

table! {
    access_tokens (token_id) {
        token_id -> Int4,
        token_value -> Text,
        active -> Bool,
        created_at -> Int8,
        expires_at -> Int8,
        account_id -> Int4,
    }
}

table! {
    refresh_tokens (token_id) {
        token_id -> Int4,
        token_value -> Text,
        active -> Bool,
        created_at -> Int8,
        expires_at -> Int8,
        account_id -> Int4,
    }
}

table! {
    access_token_scopes (token_id, scope_id) {
        token_id -> Int4,
        scope_id -> Int4,
    }
}

table! {
    refresh_token_scopes (token_id, scope_id) {
        token_id -> Int4,
        scope_id -> Int4,
    }
}

joinable!(access_tokens -> accounts (account_id));
joinable!(refresh_tokens -> accounts (account_id));
joinable!(access_token_scopes -> access_tokens (token_id));
joinable!(access_token_scopes -> scopes (scope_id));
joinable!(refresh_token_scopes -> refresh_tokens (token_id));
joinable!(refresh_token_scopes -> scopes (scope_id));

allow_tables_to_appear_in_same_query!(
    accounts,
    scopes,
    access_tokens,
    refresh_tokens,
    access_token_scopes,
    refresh_token_scopes,
);
