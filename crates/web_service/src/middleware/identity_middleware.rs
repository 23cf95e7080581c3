use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::identity::{ExecutionContext, IdentityResolver, RequestCookies, UserId, USER_ID_COOKIE};

/// Resolves (or mints) the caller's user id before the handler runs.
///
/// The id is stored in request extensions. A newly minted id is written to
/// the response unless the handler already set the identity cookie itself.
pub struct IdentityMiddleware {
    resolver: Rc<IdentityResolver>,
}

impl IdentityMiddleware {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self {
            resolver: Rc::new(resolver),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            resolver: Rc::clone(&self.resolver),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    resolver: Rc<IdentityResolver>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let mut cookies = RequestCookies::from_request(req.request());
        let user_id = self
            .resolver
            .get_or_create(&mut ExecutionContext::Interactive(&mut cookies));

        if let Some(user_id) = user_id {
            req.extensions_mut().insert(user_id);
        }

        let pending = cookies.into_pending();
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let mut res = service.call(req).await?;

            let handler_set_cookie = res
                .response()
                .cookies()
                .any(|c| c.name() == USER_ID_COOKIE);

            if !handler_set_cookie {
                for cookie in &pending {
                    res.response_mut().add_cookie(cookie)?;
                }
            }

            Ok(res)
        })
    }
}

/// User id resolved by [`IdentityMiddleware`] for this request.
pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<UserId> {
    req.extensions().get::<UserId>().cloned()
}
