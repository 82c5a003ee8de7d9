use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use svg::Document;
use svg::node::element::{Circle, Group, Rectangle, Text, Title};

use textile_ga::entities::{Fabric, Gene, PatternPiece};
use textile_ga::eval::fitness;
use textile_ga::geometry::Raster;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
pub struct SvgDrawOptions {
    ///The theme to use for the svg
    #[serde(default)]
    pub theme: SvgLayoutTheme,
    ///Draw the rotation center of every piece
    #[serde(default)]
    pub centers: bool,
    ///Draw pixels covered by more than one piece in the collision color
    #[serde(default)]
    pub highlight_overlap: bool,
    ///Draw the bounding rectangle of all pieces
    #[serde(default)]
    pub bounding_rect: bool,
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            theme: SvgLayoutTheme::default(),
            centers: true,
            highlight_overlap: true,
            bounding_rect: true,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
pub struct SvgLayoutTheme {
    pub stroke_width_multiplier: f64,
    pub fabric_fill: Color,
    pub piece_fill: Color,
    pub overlap_fill: Color,
}

impl Default for SvgLayoutTheme {
    fn default() -> Self {
        SvgLayoutTheme::EARTH_TONES
    }
}

impl SvgLayoutTheme {
    pub const EARTH_TONES: SvgLayoutTheme = SvgLayoutTheme {
        stroke_width_multiplier: 2.0,
        fabric_fill: Color(0xCC, 0x82, 0x4A),
        piece_fill: Color(0xFF, 0xC8, 0x79),
        overlap_fill: Color(0xFF, 0x00, 0x00),
    };

    pub const GRAY: SvgLayoutTheme = SvgLayoutTheme {
        stroke_width_multiplier: 2.5,
        fabric_fill: Color(0xD3, 0xD3, 0xD3),
        piece_fill: Color(0x7A, 0x7A, 0x7A),
        overlap_fill: Color(0xD0, 0x00, 0x00),
    };
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub fn change_brightness(self, fraction: f64) -> Color {
        let Color(r, g, b) = self;
        let scale = |c: u8| (c as f64 * fraction).clamp(0.0, 255.0) as u8;
        Color(scale(r), scale(g), scale(b))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> anyhow::Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        anyhow::ensure!(hex.len() == 6 && hex.is_ascii(), "invalid color: {s}");
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Color(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::try_from(s.as_str()).map_err(serde::de::Error::custom)
    }
}

/// Draws the fabric with every piece of the gene, one unit per pixel
pub fn gene_to_svg(gene: &Gene, options: SvgDrawOptions, title: &str) -> Document {
    let fabric = gene.fabric();
    let theme = &options.theme;
    let (w, h) = (fabric.width as f64, fabric.height as f64);
    let margin = 0.05 * f64::max(w, h);
    let font_size = 0.025 * f64::max(w, h);
    let stroke_width = f64::min(w, h) * 0.001 * theme.stroke_width_multiplier;

    let label = {
        //print some information above the top left of the fabric
        let packing = fitness::packing(gene.pieces());
        let label_content = format!(
            "width: {} | height: {} | fitness: {:.5} | packing: {:.3} | {}",
            fabric.width,
            fabric.height,
            gene.peek_fitness(),
            packing,
            title
        );
        Text::new(label_content)
            .set("x", 0)
            .set("y", -0.5 * font_size)
            .set("font-size", font_size)
            .set("font-family", "monospace")
            .set("font-weight", "500")
    };

    let fabric_group = Group::new()
        .set("id", "fabric")
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", w)
                .set("height", h)
                .set("fill", theme.fabric_fill.to_string())
                .set("stroke", "black")
                .set("stroke-width", 2.0 * stroke_width),
        )
        .add(Title::new(format!("fabric, {}×{}", fabric.width, fabric.height)));

    let mut pieces_group = Group::new().set("id", "pieces");
    for (slot, piece) in gene.pieces().iter().enumerate() {
        pieces_group = pieces_group.add(piece_group(slot, piece, &options, stroke_width));
    }

    let mut document = Document::new()
        .set(
            "viewBox",
            (-margin, -margin - font_size, w + 2.0 * margin, h + 2.0 * margin + font_size),
        )
        .add(fabric_group)
        .add(pieces_group);

    if options.highlight_overlap {
        document = document.add(overlap_group(fabric, gene.pieces(), theme.overlap_fill));
    }

    let bounds = fitness::pieces_bounding_rect(gene.pieces()).filter(|_| options.bounding_rect);
    if let Some(bounds) = bounds {
        document = document.add(
            Rectangle::new()
                .set("id", "bounding_rect")
                .set("x", bounds.col_min)
                .set("y", bounds.row_min)
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-opacity", "0.5")
                .set("stroke-width", stroke_width)
                .set("stroke-dasharray", format!("{} {}", 4.0 * stroke_width, 4.0 * stroke_width)),
        );
    }

    document.add(label)
}

fn piece_group(slot: usize, piece: &PatternPiece, options: &SvgDrawOptions, stroke_width: f64) -> Group {
    let theme = &options.theme;
    let tl = piece.top_left();
    let mask = piece.rotated_mask();
    let title = Title::new(format!(
        "piece, slot: {slot}, id: {}, center: {}, orientation: {}",
        piece.id(),
        piece.center_origin,
        piece.orientation
    ));

    let mut group = Group::new()
        .set("id", format!("piece_{slot}"))
        .set("fill", theme.piece_fill.to_string())
        .set("fill-opacity", "0.8")
        .set("stroke", theme.piece_fill.change_brightness(0.5).to_string())
        .set("stroke-width", stroke_width)
        .add(title);

    // one rectangle per run of set pixels within a row
    for row in 0..mask.height() {
        let mut col = 0;
        while col < mask.width() {
            if !mask.bit(row, col) {
                col += 1;
                continue;
            }
            let start = col;
            while col < mask.width() && mask.bit(row, col) {
                col += 1;
            }
            group = group.add(
                Rectangle::new()
                    .set("x", tl.col + start as i64)
                    .set("y", tl.row + row as i64)
                    .set("width", col - start)
                    .set("height", 1),
            );
        }
    }

    if options.centers {
        group = group.add(
            Circle::new()
                .set("cx", piece.center_origin.col as f64 + 0.5)
                .set("cy", piece.center_origin.row as f64 + 0.5)
                .set("r", 0.5)
                .set("fill", "black"),
        );
    }
    group
}

/// Pixels covered by more than one piece
fn overlap_group(fabric: &Fabric, pieces: &[PatternPiece], color: Color) -> Group {
    let mut coverage = vec![0u16; fabric.width * fabric.height];
    for piece in pieces {
        let bbox = piece.bbox();
        for row in bbox.row_min.max(0)..bbox.row_max.min(fabric.height as i64) {
            for col in bbox.col_min.max(0)..bbox.col_max.min(fabric.width as i64) {
                if piece.covers(row, col) {
                    coverage[row as usize * fabric.width + col as usize] += 1;
                }
            }
        }
    }

    let mut group = Group::new()
        .set("id", "overlap")
        .set("fill", color.to_string())
        .set("fill-opacity", "0.8");
    for (i, _) in coverage.iter().enumerate().filter(|(_, c)| **c > 1) {
        group = group.add(
            Rectangle::new()
                .set("x", i % fabric.width)
                .set("y", i / fabric.width)
                .set("width", 1)
                .set("height", 1),
        );
    }
    group
}
