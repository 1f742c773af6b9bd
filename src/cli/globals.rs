/// Process-wide configuration, built once in the dispatch layer and passed
/// into each component constructor. The provider app-client id was a
/// hard-coded constant in earlier revisions; it now always travels here.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub idp_url: String,
    pub idp_client_id: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(idp_url: String, idp_client_id: String) -> Self {
        Self {
            idp_url,
            idp_client_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            "https://cognito-idp.ap-south-1.amazonaws.com".to_string(),
            "3sj9a6lhd7nppmrdiv0js1511g".to_string(),
        );
        assert_eq!(args.idp_url, "https://cognito-idp.ap-south-1.amazonaws.com");
        assert_eq!(args.idp_client_id, "3sj9a6lhd7nppmrdiv0js1511g");
    }
}
