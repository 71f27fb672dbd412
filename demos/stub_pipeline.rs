//! Walks the sign-in pipeline end to end against in-process stubs.
//!
//! 1. Implement [`IdentityService`] to hand out a scoped credential triple.
//! 2. Implement [`SigninHttpClient`] so the federation exchange answers locally.
//! 3. Wire both into [`ConsoleSignin::with_http_client`] and request a login URL.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use console_signin::{
	auth::{PolicyArn, PrincipalName, ScopedCredential, ScopedCredentialRequest},
	config::SigninConfig,
	console::ConsoleSignin,
	http::{HttpFuture, HttpResponse, ResponseBody, SigninHttpClient},
	identity::{IdentityFuture, IdentityService},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = SigninConfig::for_region("us-east-1")?;
	let signin: ConsoleSignin<LocalFederation> =
		ConsoleSignin::with_http_client(Arc::new(LocalIdentity), config, LocalFederation);
	let request = ScopedCredentialRequest::new(
		PrincipalName::new("ecr-reader")?,
		PolicyArn::new("arn:aws:iam::aws:policy/AmazonEC2ContainerRegistryReadOnly")?,
	);
	let token = signin.sign_in_token(&request).await?;

	println!("Token valid until {:?}.", token.expires_at());
	println!("{}", token.sign_in_url("https://console.aws.amazon.com/ecr")?);

	Ok(())
}

struct LocalIdentity;
impl IdentityService for LocalIdentity {
	fn issue_scoped_credentials<'a>(
		&'a self,
		request: &'a ScopedCredentialRequest,
	) -> IdentityFuture<'a> {
		Box::pin(async move {
			println!(
				"Issuing credentials for {} bounded by {}.",
				request.principal(),
				request.permission_boundary()
			);

			Ok(ScopedCredential::new("AKIAEXAMPLE", "demo-secret", "demo-session")?)
		})
	}
}

struct LocalFederation;
impl SigninHttpClient for LocalFederation {
	type Body = LocalBody;

	fn get<'a>(&'a self, url: &'a Url) -> HttpFuture<'a, HttpResponse<Self::Body>> {
		Box::pin(async move {
			println!("GET {}{}", url.host_str().unwrap_or_default(), url.path());

			Ok(HttpResponse { status: 200, body: LocalBody })
		})
	}
}

struct LocalBody;
impl ResponseBody for LocalBody {
	fn read_to_end(self) -> HttpFuture<'static, Vec<u8>> {
		Box::pin(async move { Ok(br#"{"SigninToken":"demo-signin-token"}"#.to_vec()) })
	}
}
