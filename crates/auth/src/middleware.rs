use std::task::{Context, Poll};

use futures::TryFutureExt;
use futures::future::{Either, ErrInto, Ready, ready};
use http::Request;
use tower::{BoxError, Layer, Service};
use tracing::warn;

use crate::credential::Authenticate;

/// Authenticates every request before handing it to the inner service.
///
/// Headers are computed and attached synchronously in `call`, before the
/// inner future exists, so a cancelled request can never carry a partial
/// header set. A signing failure short-circuits with the error; the inner
/// service never sees an unauthenticated request.
#[derive(Clone, Debug)]
pub struct AuthLayer<A> {
    authenticator: A,
}

impl<A> AuthLayer<A> {
    pub fn new(authenticator: A) -> Self {
        Self { authenticator }
    }
}

impl<S, A: Clone> Layer<S> for AuthLayer<A> {
    type Service = AuthService<S, A>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            authenticator: self.authenticator.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthService<S, A> {
    inner: S,
    authenticator: A,
}

impl<S, A, B> Service<Request<B>> for AuthService<S, A>
where
    S: Service<Request<B>>,
    S::Error: Into<BoxError>,
    A: Authenticate,
    B: AsRef<[u8]>,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = Either<Ready<Result<S::Response, BoxError>>, ErrInto<S::Future, BoxError>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if let Err(error) = self.authenticator.authenticate(&mut request) {
            warn!(
                method = %request.method(),
                uri = %request.uri(),
                configuration = error.is_configuration(),
                %error,
                "request authentication failed"
            );
            return Either::Left(ready(Err(error.into())));
        }
        Either::Right(self.inner.call(request).err_into())
    }
}
