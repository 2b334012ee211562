use crate::core::chunker::Chunk;
use crate::core::summary::{PreparedVideo, VideoSummary};
use crate::core::transcript::format_timestamp;
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

pub fn time_range(chunk: &Chunk) -> String {
    format!(
        "{} - {}",
        format_timestamp(chunk.start),
        format_timestamp(chunk.end)
    )
}

/// Renders a finished summary as a markdown document.
pub fn render_markdown(summary: &VideoSummary) -> String {
    let mut out = String::new();

    match &summary.metadata {
        Some(metadata) => {
            let _ = writeln!(out, "# {}\n", metadata.title);
            if let Some(url) = &metadata.thumbnail_url {
                let _ = writeln!(out, "![thumbnail]({url})\n");
            }
            let _ = writeln!(out, "Channel: {}\n", metadata.channel);
            let _ = writeln!(
                out,
                "Published: {}\n",
                metadata.published.format("%Y-%m-%d %H:%M UTC")
            );
        }
        None => {
            let _ = writeln!(out, "# Video {}\n", summary.video_id);
        }
    }

    let _ = writeln!(out, "## Executive Summary\n");
    let _ = writeln!(out, "{}\n", summary.result.executive.trim());

    let _ = writeln!(out, "## Section-wise Summary\n");
    for section in &summary.result.sections {
        let _ = writeln!(out, "**{}**\n", time_range(&section.chunk));
        let _ = writeln!(out, "{}\n", section.summary.trim());
        let _ = writeln!(out, "---\n");
    }

    out
}

/// One line per chunk: time range and word count.
pub fn render_chunk_plan(video: &PreparedVideo) -> String {
    let mut out = String::new();

    if let Some(metadata) = &video.metadata {
        let _ = writeln!(out, "{} ({})", metadata.title, metadata.channel);
    }
    let _ = writeln!(
        out,
        "Video {}: {} sections",
        video.video_id,
        video.chunks.len()
    );

    for (i, chunk) in video.chunks.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<21} {:>6} words",
            i + 1,
            time_range(chunk),
            chunk.word_count()
        );
    }

    out
}

/// Wraps prose to `width` columns, keeping list items hanging under their
/// bullet and leaving headings, rules and images untouched.
pub fn wrap_markdown(markdown: &str, width: usize) -> String {
    let width = width.max(20);

    markdown
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || trimmed.starts_with("![")
                || trimmed.starts_with("---")
            {
                return line.to_string();
            }

            let indent = bullet_indent(line);
            let options = textwrap::Options::new(width).subsequent_indent(&indent);
            textwrap::fill(line, options)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_indent(line: &str) -> String {
    let rest = line.trim_start();
    let leading = line[..line.len() - rest.len()].width();

    let marker_len = if rest.starts_with("- ") || rest.starts_with("* ") || rest.starts_with("• ")
    {
        rest.find(' ').map(|i| rest[..=i].width()).unwrap_or(0)
    } else {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 && rest[digits..].starts_with(". ") {
            digits + 2
        } else {
            0
        }
    };

    " ".repeat(leading + marker_len)
}
