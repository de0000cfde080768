use rocket::Responder;
use rocket::http::Header;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;

/// Wraps a response and hands the issued bearer token back in the
/// `Authorization` header.
#[derive(Responder)]
pub struct WithToken<R> {
    inner: R,
    authorization: Header<'static>,
}

impl<R> WithToken<R> {
    pub fn new(inner: R, token: &str) -> Self {
        WithToken {
            inner,
            authorization: Header::new("Authorization", format!("Bearer {}", token)),
        }
    }
}

impl<R: OpenApiResponderInner> OpenApiResponderInner for WithToken<R> {
    fn responses(generator: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        R::responses(generator)
    }
}
