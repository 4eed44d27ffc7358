use crate::network::client::PanelEndpoints;
use crate::network::errors::NetworkError;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
const XHR_HEADER: &str = "X-Requested-With";

// * IdentityProfile defines the browser the panel's web UI expects to talk to.
#[derive(Debug, Clone)]
pub struct IdentityProfile {
    pub chrome_version: &'static str,
    pub user_agent: String,
    pub accept_language: &'static str,
}

impl IdentityProfile {
    // * Desktop Chrome 135 on Windows, same as the panel's own frontend sends.
    pub fn generate_chrome_135() -> Self {
        let major_version = "135";

        Self {
            chrome_version: major_version,
            user_agent: format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36",
                major_version
            ),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8",
        }
    }

    // * Headers for the form-encoded POST to /login.
    pub fn login_headers(&self) -> Result<HeaderMap, NetworkError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(XHR_HEADER, HeaderValue::from_static("XMLHttpRequest"));
        Ok(headers)
    }

    // * Headers for the XHR POST to /panel/inbound/list.
    // * Origin and Referer must match the panel or it answers with the login page.
    pub fn inbound_list_headers(
        &self,
        endpoints: &PanelEndpoints,
    ) -> Result<HeaderMap, NetworkError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(self.accept_language));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(ORIGIN, HeaderValue::from_str(&endpoints.base_url)?);
        headers.insert(REFERER, HeaderValue::from_str(endpoints.inbounds_page.as_str())?);
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(XHR_HEADER, HeaderValue::from_static("XMLHttpRequest"));
        Ok(headers)
    }
}
