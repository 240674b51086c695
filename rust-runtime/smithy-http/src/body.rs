/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use bytes::Bytes;
use http::{HeaderMap, HeaderValue};
use pin_project::pin_project;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Formatter};
use std::pin::Pin;
use std::task::{Context, Poll};

pub type Error = Box<dyn StdError + Send + Sync>;

/// SdkBody type
///
/// This is the Body used for dispatching all HTTP Requests and for carrying HTTP responses
/// back through the middleware stack.
///
/// In-memory bodies can be cloned (see [`SdkBody::try_clone`]), which is what makes a request
/// retryable. Streaming bodies wrap a `hyper::Body` and can only be read once.
#[pin_project]
pub struct SdkBody {
    #[pin]
    inner: Inner,
}

#[pin_project(project = InnerProj)]
enum Inner {
    Once(Option<Bytes>),
    Streaming(#[pin] hyper::Body),
    Taken,
}

impl Debug for SdkBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Once(Some(bytes)) => f.debug_tuple("Once").field(bytes).finish(),
            Inner::Once(None) => f.write_str("Once(<consumed>)"),
            Inner::Streaming(_) => f.write_str("Streaming"),
            Inner::Taken => f.write_str("Taken"),
        }
    }
}

impl SdkBody {
    pub fn empty() -> Self {
        SdkBody {
            inner: Inner::Once(None),
        }
    }

    /// A body that has already been consumed, eg. after the response handler took ownership of
    /// the body of a raw response.
    pub fn taken() -> Self {
        SdkBody { inner: Inner::Taken }
    }

    /// If possible, return a reference to the bytes contained in this body
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.inner {
            Inner::Once(Some(b)) => Some(b),
            Inner::Once(None) => Some(&[]),
            _ => None,
        }
    }

    /// Clone this body if it is held in memory
    ///
    /// Streaming bodies can't be replayed so they return `None`.
    pub fn try_clone(&self) -> Option<Self> {
        match &self.inner {
            Inner::Once(bytes) => Some(SdkBody {
                inner: Inner::Once(bytes.clone()),
            }),
            _ => None,
        }
    }

    pub fn content_length(&self) -> Option<u64> {
        http_body::Body::size_hint(self).exact()
    }
}

impl From<&str> for SdkBody {
    fn from(s: &str) -> Self {
        SdkBody::from(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for SdkBody {
    fn from(s: String) -> Self {
        SdkBody::from(Bytes::from(s))
    }
}

impl From<Bytes> for SdkBody {
    fn from(bytes: Bytes) -> Self {
        SdkBody {
            inner: Inner::Once(Some(bytes)),
        }
    }
}

impl From<Vec<u8>> for SdkBody {
    fn from(data: Vec<u8>) -> SdkBody {
        Self::from(Bytes::from(data))
    }
}

impl From<hyper::Body> for SdkBody {
    fn from(body: hyper::Body) -> Self {
        SdkBody {
            inner: Inner::Streaming(body),
        }
    }
}

impl http_body::Body for SdkBody {
    type Data = Bytes;
    type Error = Error;

    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Data, Self::Error>>> {
        match self.project().inner.project() {
            InnerProj::Once(opt) => match opt.take() {
                Some(bytes) if bytes.is_empty() => Poll::Ready(None),
                Some(bytes) => Poll::Ready(Some(Ok(bytes))),
                None => Poll::Ready(None),
            },
            InnerProj::Streaming(body) => http_body::Body::poll_data(body, cx).map_err(|e| e.into()),
            InnerProj::Taken => {
                Poll::Ready(Some(Err("A `Taken` body should never be polled".into())))
            }
        }
    }

    fn poll_trailers(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<HeaderMap<HeaderValue>>, Self::Error>> {
        match self.project().inner.project() {
            InnerProj::Streaming(body) => {
                http_body::Body::poll_trailers(body, cx).map_err(|e| e.into())
            }
            _ => Poll::Ready(Ok(None)),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.inner {
            Inner::Once(None) => true,
            Inner::Once(Some(bytes)) => bytes.is_empty(),
            Inner::Streaming(body) => http_body::Body::is_end_stream(body),
            Inner::Taken => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match &self.inner {
            Inner::Once(None) => http_body::SizeHint::with_exact(0),
            Inner::Once(Some(bytes)) => http_body::SizeHint::with_exact(bytes.len() as u64),
            Inner::Streaming(body) => http_body::Body::size_hint(body),
            Inner::Taken => http_body::SizeHint::new(),
        }
    }
}
