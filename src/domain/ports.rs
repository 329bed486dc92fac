use crate::domain::model::Invocation;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 抓取遠端頁面
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 取得影片頁面 HTML；非 2xx 狀態視為錯誤
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// 取得連結頁面的 `<title>`；只有 200 回應才會解析
    async fn fetch_title(&self, url: &str) -> Result<Option<String>>;
}

/// 把過長的標題縮短
#[async_trait]
pub trait TitleShortener: Send + Sync {
    async fn shorten(&self, text: &str, api_key: &str) -> Result<Option<String>>;
}

/// 執行外部程序並回傳退出碼
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        (**self).run(invocation)
    }
}
