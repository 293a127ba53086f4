// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host implementations of the bridge seams.
//!
//! | Seam | Adapter |
//! |------|---------|
//! | [`HttpTransport`](crate::HttpTransport) | [`ReqwestTransport`] (blocking reqwest) |
//! | [`WirelessLink`](crate::WirelessLink) | [`HostLink`] (host network interfaces) |
//! | [`Uart`](thermolink_micro::Uart) | [`StdinUart`], or `thermolink_micro::transport::SerialUart` |

mod http;
mod link;
mod stdin;

pub use http::ReqwestTransport;
pub use link::HostLink;
pub use stdin::StdinUart;
