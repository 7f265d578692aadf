use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use sharecast_core::{
    config::UpstreamConfig,
    errors::{DispatchError, DispatchResult},
    traits::TokenResolver,
};

// 带引号的形式优先，捕获组只取引号内的令牌本体
static QUOTED_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(EAAG[a-zA-Z0-9_\-]+)""#).expect("Invalid quoted token regex")
});
static BARE_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"EAAG[a-zA-Z0-9_\-]+").expect("Invalid bare token regex"));

/// 页面抓取使用的浏览器标识，与分享请求的User-Agent无关
const RESOLVER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const RESOLVER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Cookie凭证转换器
///
/// 携带浏览器头部访问上游管理页面，从返回的页面内容中提取访问令牌。
pub struct CookieTokenResolver {
    client: reqwest::Client,
    upstream: UpstreamConfig,
    /// 单次转换请求的超时时间
    timeout: Duration,
}

impl CookieTokenResolver {
    /// 创建新的凭证转换器
    pub fn new(client: reqwest::Client, upstream: UpstreamConfig, timeout: Duration) -> Self {
        Self {
            client,
            upstream,
            timeout,
        }
    }
}

#[async_trait]
impl TokenResolver for CookieTokenResolver {
    async fn resolve(&self, cookie: &str) -> DispatchResult<String> {
        info!("开始转换Cookie凭证");

        let response = self
            .client
            .get(&self.upstream.token_url)
            .header("accept", RESOLVER_ACCEPT)
            .header("accept-language", "en-US,en;q=0.9")
            .header("cache-control", "max-age=0")
            .header("cookie", cookie)
            .header("referer", "https://www.facebook.com/")
            .header("user-agent", RESOLVER_USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!("凭证转换请求超时");
                return Err(DispatchError::CredentialTimeout);
            }
            Err(e) => {
                warn!("凭证转换连接失败: {e}");
                return Err(DispatchError::UpstreamUnreachable(e.to_string()));
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("上游拒绝凭证: 状态码={}", status);
            return Err(DispatchError::CredentialRejected);
        }

        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::UpstreamUnreachable(e.to_string()))?;

        match extract_token(&body) {
            Some(token) => {
                info!("凭证转换成功: 令牌长度={}", token.len());
                Ok(token)
            }
            None => {
                debug!("页面中未找到令牌: 页面长度={}", body.len());
                Err(DispatchError::TokenNotFound)
            }
        }
    }
}

/// 从页面内容中提取访问令牌
///
/// 优先匹配带引号的形式并剥掉引号，找不到时退化为匹配裸令牌。
pub(crate) fn extract_token(body: &str) -> Option<String> {
    if let Some(captures) = QUOTED_TOKEN_REGEX.captures(body) {
        if let Some(token) = captures.get(1) {
            return Some(token.as_str().to_string());
        }
    }

    BARE_TOKEN_REGEX
        .find(body)
        .map(|token| token.as_str().to_string())
}
