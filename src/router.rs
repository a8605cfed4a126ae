//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Routers can be nested
//! under a prefix, which is how the user routes end up below `/api`.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::error::{route_not_found, Error};
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup. Each [`Router::on`] call returns `self` so
/// registrations chain naturally.
pub struct Router {
    trees: HashMap<Method, MatchitRouter<BoxedHandler>>,
    // Registration log, replayed when this router is nested into another.
    routes: Vec<(Method, String, BoxedHandler)>,
}

impl Router {
    pub fn new() -> Self {
        Self { trees: HashMap::new(), routes: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use http::Method;
    /// # use roster::{Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET,  "/users/{id}", get_user)
    ///     .on(Method::POST, "/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or conflicts with one
    /// already registered for the same method.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path.to_owned(), handler.into_boxed_handler())
    }

    /// Mount every route of `other` below `prefix`.
    ///
    /// ```rust
    /// # use http::Method;
    /// # use roster::{Request, Response, Router};
    /// # async fn list(_: Request) -> Response { Response::text("") }
    /// let api = Router::new().on(Method::GET, "/users", list);
    /// let app = Router::new().nest("/api", api); // GET /api/users
    /// ```
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Router::on`].
    pub fn nest(self, prefix: &str, other: Router) -> Self {
        let prefix = prefix.trim_end_matches('/');
        other.routes.into_iter().fold(self, |router, (method, path, handler)| {
            router.add(method, format!("{prefix}{path}"), handler)
        })
    }

    fn add(mut self, method: Method, path: String, handler: BoxedHandler) -> Self {
        self.trees
            .entry(method.clone())
            .or_default()
            .insert(path.clone(), Arc::clone(&handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.routes.push((method, path, handler));
        self
    }

    /// Finds the handler for a request line.
    ///
    /// `HEAD` falls back to the `GET` route, and a single trailing slash is
    /// ignored, so `/users/` reaches `/users`. Matching is case-sensitive.
    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(&BoxedHandler, HashMap<String, String>)> {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => Some(rest),
            _ => None,
        };
        let fallback = (*method == Method::HEAD).then_some(Method::GET);

        std::iter::once(method)
            .chain(fallback.as_ref())
            .flat_map(|m| std::iter::once(path).chain(trimmed).map(move |p| (m, p)))
            .find_map(|(m, p)| self.find(m, p))
    }

    fn find(&self, method: &Method, path: &str) -> Option<(&BoxedHandler, HashMap<String, String>)> {
        let tree = self.trees.get(method)?;
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value, params))
    }

    /// Runs the matching handler, or answers `404 Route not found`.
    pub(crate) async fn route(&self, mut req: Request) -> Result<Response, Error> {
        let Some((handler, params)) = self.lookup(&req.method, &req.path) else {
            return Ok(route_not_found());
        };
        req.params = params;
        handler.call(req).await
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode};

    use super::*;

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    async fn list(_req: Request) -> &'static str {
        "list"
    }

    fn request(method: Method, path: &str) -> Request {
        Request::new(method, path, HeaderMap::new(), Bytes::new())
    }

    fn app() -> Router {
        let users = Router::new()
            .on(Method::GET, "/users", list)
            .on(Method::GET, "/users/{id}", echo_id);
        Router::new().nest("/api", users)
    }

    #[tokio::test]
    async fn nested_routes_carry_params() {
        let res = app().route(request(Method::GET, "/api/users/42")).await.unwrap();
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn unmatched_path_is_route_not_found() {
        let res = app().route(request(Method::GET, "/users")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), br#"{"error":"Route not found"}"#);
    }

    #[tokio::test]
    async fn unmatched_method_is_route_not_found() {
        let res = app().route(request(Method::PATCH, "/api/users")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn trailing_slash_and_head_fall_back() {
        let router = app();
        let res = router.route(request(Method::GET, "/api/users/")).await.unwrap();
        assert_eq!(res.body(), b"list");
        let res = router.route(request(Method::HEAD, "/api/users")).await.unwrap();
        assert_eq!(res.body(), b"list");
    }

    #[tokio::test]
    async fn paths_match_case_sensitively() {
        let res = app().route(request(Method::GET, "/API/Users")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        let res = app().route(request(Method::GET, "/api/users/AbC")).await.unwrap();
        assert_eq!(res.body(), b"AbC");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new()
            .on(Method::GET, "/users", list)
            .on(Method::GET, "/users", list);
    }
}
