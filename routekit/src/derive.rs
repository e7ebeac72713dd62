//! Derivation of client trees from API descriptions.
//!
//! [`derive`] walks an [`Api`] once, carrying the request prefix seen so far.
//! Prefix combinators extend the plan, `Alt` derives both sides from copies of
//! the same plan, and leaves close it into an [`Endpoint`].

use std::sync::Arc;

use reqwest::header::HeaderName;
use tracing::debug;
use url::Url;

use crate::api::{Api, ResultShape};
use crate::client::{ClientEnv, ClientTree, Endpoint, EndpointPlan, Leaf, Param, Plan};
use crate::error::DescriptionError;
use crate::policy::AcceptedStatus;
use crate::transport::Transport;

fn require_name(node: &'static str, name: &str, plan: &Plan) -> Result<(), DescriptionError> {
    if name.is_empty() {
        return Err(DescriptionError::empty_name(node, plan.route()));
    }
    Ok(())
}

fn require_header_name(name: &str, plan: &Plan) -> Result<(), DescriptionError> {
    if HeaderName::from_bytes(name.as_bytes()).is_err() {
        return Err(DescriptionError::InvalidHeaderName {
            name: name.to_string(),
            route: plan.route(),
        });
    }
    Ok(())
}

/// Derives the client tree for `api` below the prefix `plan`.
pub(crate) fn derive<T: Transport>(
    api: &Api,
    mut plan: Plan,
    env: &ClientEnv<T>,
    base_url: &Option<Arc<Url>>,
) -> Result<ClientTree<T>, DescriptionError> {
    match api {
        Api::Path { segment, sub } => {
            if segment.is_empty() {
                return Err(DescriptionError::EmptySegment { route: plan.route() });
            }
            plan.push_segment(segment.clone());
            derive(sub, plan, env, base_url)
        }
        Api::Capture { name, sub } => {
            require_name("capture", name, &plan)?;
            plan.push_param(Param::Capture { name: name.clone() });
            derive(sub, plan, env, base_url)
        }
        Api::Header { name, sub } => {
            require_name("header", name, &plan)?;
            require_header_name(name, &plan)?;
            plan.push_param(Param::Header { name: name.clone() });
            derive(sub, plan, env, base_url)
        }
        Api::QueryParam { name, sub } => {
            require_name("query param", name, &plan)?;
            plan.push_param(Param::QueryParam { name: name.clone() });
            derive(sub, plan, env, base_url)
        }
        Api::QueryParams { name, sub } => {
            require_name("query params", name, &plan)?;
            plan.push_param(Param::QueryParams { name: name.clone() });
            derive(sub, plan, env, base_url)
        }
        Api::QueryFlag { name, sub } => {
            require_name("query flag", name, &plan)?;
            plan.push_param(Param::QueryFlag { name: name.clone() });
            derive(sub, plan, env, base_url)
        }
        Api::ReqBody { media_types, sub } => {
            if media_types.is_empty() {
                return Err(DescriptionError::empty_media_types("request body", plan.route()));
            }
            plan.push_param(Param::Body {
                media_types: media_types.clone(),
            });
            derive(sub, plan, env, base_url)
        }
        Api::Verb(verb) => {
            let accepted = AcceptedStatus::for_verb(verb.method, &verb.result).ok_or_else(|| {
                DescriptionError::UnsupportedVerb {
                    method: verb.method,
                    route: plan.route(),
                }
            })?;
            if verb.result != ResultShape::Unit && verb.media_types.is_empty() {
                return Err(DescriptionError::empty_media_types("response", plan.route()));
            }
            if let ResultShape::ValueWithHeaders(names) = &verb.result {
                for name in names {
                    require_header_name(name, &plan)?;
                }
            }
            let endpoint_plan = plan.finish(Leaf::Verb {
                verb: verb.clone(),
                accepted,
            });
            Ok(ClientTree::Endpoint(leaf(endpoint_plan, env, base_url)))
        }
        Api::Raw => {
            plan.push_param(Param::Method);
            Ok(ClientTree::Endpoint(leaf(plan.finish(Leaf::Raw), env, base_url)))
        }
        Api::Alt(left, right) => {
            let left = derive(left, plan.clone(), env, base_url)?;
            let right = derive(right, plan, env, base_url)?;
            Ok(ClientTree::alt(left, right))
        }
    }
}

fn leaf<T>(
    plan: EndpointPlan,
    env: &ClientEnv<T>,
    base_url: &Option<Arc<Url>>,
) -> Endpoint<T> {
    let endpoint = Endpoint::new(plan, env.clone(), base_url.clone());
    debug!(
        endpoint = %endpoint.signature(),
        params = endpoint.params().len(),
        "derived endpoint"
    );
    endpoint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Route, Verb};
    use crate::client::ParamKind;
    use crate::error::TransportError;
    use crate::method::RestMethod;
    use crate::request::Request;
    use crate::transport::HttpResponse;

    struct Unreachable;

    impl Transport for Unreachable {
        async fn send(
            &self,
            _request: Request,
            _base_url: Option<&Url>,
        ) -> Result<HttpResponse, TransportError> {
            Err(TransportError::Other("unreachable".to_string()))
        }
    }

    fn derive_api(api: &Api) -> Result<ClientTree<Unreachable>, DescriptionError> {
        ClientEnv::new(Unreachable).client(api, None)
    }

    #[test]
    fn test_params_follow_combinator_order() {
        let api = Route::new()
            .path("users")
            .capture("id")
            .header("X-Trace")
            .query_param("fields")
            .query_params("tag")
            .query_flag("verbose")
            .body([mime::APPLICATION_JSON])
            .verb(Verb::json(RestMethod::Put));

        let tree = derive_api(&api).unwrap();
        let endpoint = tree.as_endpoint().unwrap();
        let kinds: Vec<_> = endpoint.params().iter().map(Param::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParamKind::Capture,
                ParamKind::Header,
                ParamKind::QueryParam,
                ParamKind::QueryParams,
                ParamKind::QueryFlag,
                ParamKind::Body,
            ]
        );
        assert_eq!(endpoint.signature(), "PUT /users/:id");
    }

    #[test]
    fn test_alt_shares_prefix() {
        let api = Route::new().path("items").to(Route::new()
            .verb(Verb::json(RestMethod::Get))
            .or(Route::new().capture("id").verb(Verb::unit(RestMethod::Delete))));

        let tree = derive_api(&api).unwrap();
        assert_eq!(tree.len(), 2);
        let signatures: Vec<_> = tree.endpoints().iter().map(|e| e.signature().to_string()).collect();
        assert_eq!(signatures, vec!["GET /items", "DELETE /items/:id"]);
    }

    #[test]
    fn test_raw_takes_method_last() {
        let api = Route::new().path("files").capture("name").raw();
        let tree = derive_api(&api).unwrap();
        let endpoint = tree.as_endpoint().unwrap();
        assert!(endpoint.is_raw());
        assert_eq!(endpoint.params().last(), Some(&Param::Method));
        assert_eq!(endpoint.signature(), "RAW /files/:name");
    }

    #[test]
    fn test_rejects_non_declarative_verb() {
        let api = Route::new().path("ping").verb(Verb::unit(RestMethod::Head));
        let err = derive_api(&api).unwrap_err();
        assert_eq!(
            err,
            DescriptionError::UnsupportedVerb {
                method: RestMethod::Head,
                route: "/ping".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_empty_body_media_types() {
        let api = Route::new()
            .body(Vec::new())
            .verb(Verb::unit(RestMethod::Post));
        assert!(matches!(
            derive_api(&api),
            Err(DescriptionError::EmptyMediaTypes { node: "request body", .. })
        ));
    }

    #[test]
    fn test_rejects_value_verb_without_media_types() {
        let api = Route::new().verb(Verb::new(RestMethod::Get, ResultShape::Value));
        assert!(matches!(
            derive_api(&api),
            Err(DescriptionError::EmptyMediaTypes { node: "response", .. })
        ));
    }

    #[test]
    fn test_unit_verb_needs_no_media_types() {
        let api = Route::new().verb(Verb::unit(RestMethod::Delete));
        assert!(derive_api(&api).is_ok());
    }

    #[test]
    fn test_rejects_empty_names() {
        let segment = Route::new().path("a").path("").raw();
        assert_eq!(
            derive_api(&segment).unwrap_err(),
            DescriptionError::EmptySegment {
                route: "/a".to_string()
            }
        );

        let header = Route::new().header("").raw();
        assert!(matches!(
            derive_api(&header),
            Err(DescriptionError::EmptyName { node: "header", .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_request_header_name() {
        let api = Route::new()
            .path("jobs")
            .header("bad name")
            .verb(Verb::unit(RestMethod::Get));
        assert_eq!(
            derive_api(&api).unwrap_err(),
            DescriptionError::InvalidHeaderName {
                name: "bad name".to_string(),
                route: "/jobs".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_invalid_response_header_name() {
        let api = Route::new()
            .path("docs")
            .capture("id")
            .verb(Verb::json(RestMethod::Get).with_headers(["ETag", "x:total"]));
        assert_eq!(
            derive_api(&api).unwrap_err(),
            DescriptionError::InvalidHeaderName {
                name: "x:total".to_string(),
                route: "/docs/:id".to_string(),
            }
        );
    }

    #[test]
    fn test_accepts_mixed_case_header_names() {
        let api = Route::new()
            .header("X-Request-Id")
            .verb(Verb::json(RestMethod::Get).with_headers(["X-Total-Count"]));
        assert!(derive_api(&api).is_ok());
    }

    #[test]
    fn test_error_in_right_branch_fails_whole_tree() {
        let api = Route::new()
            .verb(Verb::unit(RestMethod::Get))
            .or(Route::new().verb(Verb::unit(RestMethod::Trace)));
        assert!(derive_api(&api).is_err());
    }
}
