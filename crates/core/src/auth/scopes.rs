use super::AuthError;

/// Shortest token accepted by the stub.
pub const MIN_TOKEN_LEN: usize = 10;

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingHeader),
    };
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidScheme)?;
    if token.len() < MIN_TOKEN_LEN {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

/// Splits a configured scope list on commas and whitespace, dropping empties.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scope a route requires, chosen from the configured valid scopes.
///
/// Reads under `/shows` need the first scope containing `shows.read`; creating
/// shows needs the first containing `shows.write`. Returns `None` when the
/// route needs no scope or no matching scope is configured.
pub fn required_scope<'a>(method: &str, path: &str, valid_scopes: &'a [String]) -> Option<&'a str> {
    let is_shows = path == "/shows" || path.starts_with("/shows/");
    let marker = match method {
        "GET" if is_shows => "shows.read",
        "POST" if path == "/shows" => "shows.write",
        _ => return None,
    };
    valid_scopes
        .iter()
        .find(|scope| scope.contains(marker))
        .map(String::as_str)
}

/// True if `required` is absent or present among `token_scopes`.
pub fn has_valid_scope(token_scopes: &[String], required: Option<&str>) -> bool {
    match required {
        None => true,
        Some(required) => token_scopes.iter().any(|scope| scope == required),
    }
}

/// Like [`has_valid_scope`], but the required scope must also be one of the
/// configured valid scopes.
pub fn has_valid_scope_from_config(
    token_scopes: &[String],
    required: Option<&str>,
    valid_scopes: &[String],
) -> bool {
    if let Some(required) = required {
        if !valid_scopes.iter().any(|scope| scope == required) {
            return false;
        }
    }
    has_valid_scope(token_scopes, required)
}
