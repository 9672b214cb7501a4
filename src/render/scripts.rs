/// Script blocks appended to a rendered island container.
#[derive(Debug, Clone, Default)]
pub struct BootstrapScripts {
    /// Loader runtime; emitted once per response.
    pub loader_js: String,
    /// Prefetch service-worker registration; emitted with every component.
    pub prefetch_graph_js: String,
    /// Bundle-graph hint; emitted once per response.
    pub prefetch_bundle_js: String,
}

impl BootstrapScripts {
    pub fn new(
        loader_js: impl Into<String>,
        prefetch_graph_js: impl Into<String>,
        prefetch_bundle_js: impl Into<String>,
    ) -> Self {
        Self {
            loader_js: loader_js.into(),
            prefetch_graph_js: prefetch_graph_js.into(),
            prefetch_bundle_js: prefetch_bundle_js.into(),
        }
    }

    /// Script markup for one component; the first component in a response
    /// also gets the loader and bundle-graph blocks, ahead of the rest.
    pub fn compose(&self, first_in_response: bool) -> String {
        let graph = script_block("qwik-prefetch-service-worker", &self.prefetch_graph_js);
        if !first_in_response {
            return graph;
        }
        format!(
            "{}{}{}",
            script_block("qwik-loader", &self.loader_js),
            script_block("qwik-prefetch-bundle-graph", &self.prefetch_bundle_js),
            graph
        )
    }
}

fn script_block(attribute: &str, body: &str) -> String {
    format!("<script {attribute}>\n{body}\n</script>\n")
}

/// Insert `scripts` right before the last `</div>` of `html` (the container's
/// closing tag); appended when there is none.
pub fn inject_scripts(html: &str, scripts: &str) -> String {
    match html.rfind("</div>") {
        Some(index) => {
            let mut out = String::with_capacity(html.len() + scripts.len());
            out.push_str(&html[..index]);
            out.push_str(scripts);
            out.push_str(&html[index..]);
            out
        }
        None => format!("{html}{scripts}"),
    }
}
