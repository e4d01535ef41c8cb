//! Request tracing middleware.
//!
//! Every request runs inside a [`TraceId`] scope and a `request` span. A
//! well-formed UUID in an incoming `trace-id` header is reused so callers can
//! correlate their own logs; anything else is replaced by a fresh identifier.
//! The identifier is echoed in the `trace-id` response header.
//!
//! Task-local values do not follow `tokio::spawn`; wrap spawned work in
//! [`TraceId::scope`] when it must keep the identifier.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Middleware attaching a request-scoped trace identifier.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use pantry_backend::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        // The inner future is created inside the scope so extractors that
        // build errors eagerly still see the identifier.
        let fut = TraceId::scope_sync(trace_id, || self.service.call(req));
        Box::pin(
            TraceId::scope(trace_id, async move {
                let mut res = fut.await?;
                debug!(status = res.status().as_u16(), "request complete");
                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(%error, "failed to encode trace identifier header");
                    }
                }
                Ok(res)
            })
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ApiResult, Error as DomainError};
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use uuid::Uuid;

    async fn call(
        request: test::TestRequest,
    ) -> ServiceResponse<actix_web::body::BoxBody> {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route(
                    "/echo",
                    web::get().to(|| async {
                        let id = TraceId::current().map(|id| id.to_string());
                        HttpResponse::Ok().body(id.unwrap_or_default())
                    }),
                )
                .route(
                    "/fail",
                    web::get().to(|| async {
                        ApiResult::<HttpResponse>::Err(DomainError::not_found("Dispenser not found"))
                    }),
                ),
        )
        .await;
        test::call_service(&app, request.to_request()).await
    }

    fn header(res: &ServiceResponse<actix_web::body::BoxBody>) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn handlers_see_the_echoed_identifier() {
        let res = call(test::TestRequest::get().uri("/echo")).await;
        let echoed = header(&res);
        let body = test::read_body(res).await;

        assert_eq!(std::str::from_utf8(&body).expect("utf8"), echoed);
        Uuid::parse_str(&echoed).expect("uuid header");
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_inbound_identifiers_are_reused() {
        let inbound = "6f1d8c1e-6f1a-4a53-9a43-1f2a3b4c5d6e";
        let res = call(
            test::TestRequest::get()
                .uri("/echo")
                .insert_header((TRACE_ID_HEADER, inbound)),
        )
        .await;

        assert_eq!(header(&res), inbound);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_inbound_identifiers_are_replaced() {
        let res = call(
            test::TestRequest::get()
                .uri("/echo")
                .insert_header((TRACE_ID_HEADER, "not-a-uuid")),
        )
        .await;

        assert_ne!(header(&res), "not-a-uuid");
    }

    #[rstest]
    #[actix_web::test]
    async fn error_bodies_carry_the_identifier() {
        let res = call(test::TestRequest::get().uri("/fail")).await;
        let echoed = header(&res);
        let body: serde_json::Value = test::read_body_json(res).await;

        assert_eq!(body["traceId"], echoed.as_str());
        assert_eq!(body["error"], "Dispenser not found");
    }
}
