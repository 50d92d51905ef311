//! A small filter-graph AST — nodes are filter operations, edges are
//! named pads — assembled and serialized to FFmpeg's `-filter_complex`
//! textual syntax. Centralizing this guarantees escape correctness and
//! makes the graph golden-file testable, rather than hand-concatenating
//! filter strings per call site.

use clipforge_models::quality::QualityProfile;
use clipforge_models::request::TransformOptions;

/// One filter invocation: an operation name, positional/keyword
/// parameters already rendered to strings, and the named input/output
/// pads it connects.
#[derive(Debug, Clone)]
pub struct FilterNode {
    pub inputs: Vec<String>,
    pub name: String,
    pub args: Vec<String>,
    pub outputs: Vec<String>,
}

impl FilterNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inputs: Vec::new(),
            name: name.into(),
            args: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, pad: impl Into<String>) -> Self {
        self.inputs.push(pad.into());
        self
    }

    pub fn output(mut self, pad: impl Into<String>) -> Self {
        self.outputs.push(pad.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn render(&self) -> String {
        let inputs: String = self.inputs.iter().map(|p| format!("[{p}]")).collect();
        let outputs: String = self.outputs.iter().map(|p| format!("[{p}]")).collect();
        if self.args.is_empty() {
            format!("{inputs}{}{outputs}", self.name)
        } else {
            format!("{inputs}{}={}{outputs}", self.name, self.args.join(":"))
        }
    }
}

/// An ordered sequence of filter nodes, serialized with `;` joins as
/// FFmpeg expects for `-filter_complex`.
#[derive(Debug, Clone, Default)]
pub struct FilterGraph {
    nodes: Vec<FilterNode>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: FilterNode) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn serialize(&self) -> String {
        self.nodes.iter().map(FilterNode::render).collect::<Vec<_>>().join(";")
    }
}

/// Builds the optimized vertical-video filter graph:
/// a blurred upscaled-and-cropped background, a Lanczos-scaled foreground
/// padded to fit, optional denoise/sharpen/color filters in fixed order,
/// and an overlay producing the final `[video_out]` pad.
pub fn build_vertical_optimized_graph(profile: &QualityProfile, opts: &TransformOptions, subtitle_path: Option<&str>) -> FilterGraph {
    let (w, h) = (profile.width, profile.height);
    let mut graph = FilterGraph::new();

    graph.push(FilterNode::new("split").input("0:v").arg("2").output("bg_in").output("fg_in"));

    graph.push(
        FilterNode::new("scale")
            .input("bg_in")
            .arg(format!("{}:{}", (w as f64 * 1.5) as u32, (h as f64 * 1.5) as u32))
            .arg("flags=lanczos")
            .output("bg_scaled"),
    );
    graph.push(
        FilterNode::new("crop")
            .input("bg_scaled")
            .arg(w.to_string())
            .arg(h.to_string())
            .output("bg_cropped"),
    );
    graph.push(FilterNode::new("gblur").input("bg_cropped").arg("sigma=15").output("bg"));

    let mut fg_pad = "fg_in".to_string();
    let mut fg_filters = FilterGraph::new();
    fg_filters.push(
        FilterNode::new("scale")
            .input(fg_pad.clone())
            .arg(format!("{w}:{h}:force_original_aspect_ratio=decrease"))
            .arg("flags=lanczos")
            .output("fg_scaled"),
    );
    fg_pad = "fg_scaled".to_string();
    fg_filters.push(
        FilterNode::new("pad")
            .input(fg_pad.clone())
            .arg(w.to_string())
            .arg(h.to_string())
            .arg("(ow-iw)/2")
            .arg("(oh-ih)/2")
            .arg("black")
            .output("fg_padded"),
    );
    fg_pad = "fg_padded".to_string();

    if opts.denoise {
        fg_filters.push(FilterNode::new("hqdn3d").input(fg_pad.clone()).output("fg_denoised"));
        fg_pad = "fg_denoised".to_string();
    }
    if let Some(strength) = opts.clamped_sharpen() {
        fg_filters.push(
            FilterNode::new("unsharp")
                .input(fg_pad.clone())
                .arg(format!("luma_amount={strength:.2}"))
                .output("fg_sharp"),
        );
        fg_pad = "fg_sharp".to_string();
    }
    if opts.brightness.is_some() || opts.contrast.is_some() || opts.saturation.is_some() || opts.gamma.is_some() {
        let brightness = opts.brightness.unwrap_or(0.0).clamp(-1.0, 1.0);
        let contrast = opts.contrast.unwrap_or(1.0).clamp(0.0, 2.0);
        let saturation = opts.saturation.unwrap_or(1.0).clamp(0.0, 3.0);
        let gamma = opts.gamma.unwrap_or(1.0).clamp(0.1, 3.0);
        fg_filters.push(
            FilterNode::new("eq")
                .input(fg_pad.clone())
                .arg(format!("brightness={brightness:.3}"))
                .arg(format!("contrast={contrast:.3}"))
                .arg(format!("saturation={saturation:.3}"))
                .arg(format!("gamma={gamma:.3}"))
                .output("fg_eq"),
        );
        fg_pad = "fg_eq".to_string();
    }

    for node in fg_filters.nodes {
        graph.push(node);
    }

    let video_out_pad = if let Some(path) = subtitle_path.and_then(normalize_subtitle_path) {
        graph.push(
            FilterNode::new("overlay")
                .input("bg")
                .input(fg_pad.clone())
                .arg("0")
                .arg("0")
                .output("overlaid"),
        );
        graph.push(
            FilterNode::new("subtitles")
                .input("overlaid")
                .arg(format!("'{path}'"))
                .arg("force_style='FontName=Arial,FontSize=16,PrimaryColour=&Hffffff,OutlineColour=&H000000,Outline=2,Shadow=1,Alignment=2,MarginV=40'")
                .output("video_out"),
        );
        "video_out"
    } else {
        graph.push(
            FilterNode::new("overlay")
                .input("bg")
                .input(fg_pad.clone())
                .arg("0")
                .arg("0")
                .output("video_out"),
        );
        "video_out"
    };
    let _ = video_out_pad;

    graph
}

/// Builds the split-screen graph: crops left/right halves, scales each
/// to `W x H/2`, and vertically stacks them.
pub fn build_split_graph(profile: &QualityProfile, opts: &TransformOptions) -> FilterGraph {
    let (w, h) = (profile.width, profile.height);
    let half_h = h / 2;
    let mut graph = FilterGraph::new();

    graph.push(FilterNode::new("split").input("0:v").arg("2").output("left_in").output("right_in"));

    let mut left_pad = "left_in".to_string();
    let mut right_pad = "right_in".to_string();

    if opts.denoise {
        graph.push(FilterNode::new("hqdn3d").input(left_pad.clone()).output("left_denoised"));
        left_pad = "left_denoised".to_string();
        graph.push(FilterNode::new("hqdn3d").input(right_pad.clone()).output("right_denoised"));
        right_pad = "right_denoised".to_string();
    }

    graph.push(FilterNode::new("crop").input(left_pad).arg("iw/2").arg("ih").arg("0").arg("0").output("left_cropped"));
    graph.push(
        FilterNode::new("crop")
            .input(right_pad)
            .arg("iw/2")
            .arg("ih")
            .arg("iw/2")
            .arg("0")
            .output("right_cropped"),
    );

    graph.push(
        FilterNode::new("scale")
            .input("left_cropped")
            .arg(format!("{w}:{half_h}"))
            .arg("flags=lanczos")
            .output("left_scaled"),
    );
    graph.push(
        FilterNode::new("scale")
            .input("right_cropped")
            .arg(format!("{w}:{half_h}"))
            .arg("flags=lanczos")
            .output("right_scaled"),
    );

    graph.push(
        FilterNode::new("vstack")
            .input("left_scaled")
            .input("right_scaled")
            .arg("2")
            .output("video_out"),
    );

    graph
}

/// Normalizes a subtitle path to forward slashes and quotes it for the
/// `subtitles` filter. Returns `None` (rather than escaping haphazardly)
/// when normalization fails, so the caller drops the subtitle branch.
fn normalize_subtitle_path(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    let normalized = path.replace('\\', "/");
    if normalized.contains('\'') {
        return None;
    }
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_models::quality::Quality;

    #[test]
    fn optimized_graph_ends_in_video_out_pad() {
        let profile = Quality::Medium.profile();
        let opts = TransformOptions::default();
        let graph = build_vertical_optimized_graph(&profile, &opts, None);
        let serialized = graph.serialize();
        assert!(serialized.ends_with("[video_out]"));
        assert!(serialized.contains("flags=lanczos"));
    }

    #[test]
    fn split_graph_uses_even_half_height() {
        let profile = Quality::Medium.profile();
        let opts = TransformOptions::default();
        let graph = build_split_graph(&profile, &opts);
        let serialized = graph.serialize();
        assert!(serialized.contains(&format!("{}:{}", profile.width, profile.height / 2)));
    }

    #[test]
    fn subtitle_normalization_rejects_single_quotes() {
        assert!(normalize_subtitle_path("C:\\temp\\a'b.srt").is_none());
        assert_eq!(normalize_subtitle_path("C:\\temp\\a.srt"), Some("C:/temp/a.srt".to_string()));
    }

    #[test]
    fn filter_node_renders_args_with_colon_separator() {
        let node = FilterNode::new("scale").input("0:v").arg("100").arg("200").output("out");
        assert_eq!(node.render(), "[0:v]scale=100:200[out]");
    }
}
