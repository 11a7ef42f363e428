//! Rasterizes a [`FrameLayout`] with embedded-graphics primitives

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::{DrawTarget, Point, Primitive, RgbColor, Size},
    primitives::{PrimitiveStyle, Rectangle, RoundedRectangle, Triangle},
    Drawable,
};

use crate::eyes::geometry::{EyeRect, FrameLayout, Lid, Point as LayoutPoint};

/// Background and eye colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb565,
    pub eye: Rgb565,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb565::BLACK,
            eye: Rgb565::WHITE,
        }
    }
}

impl Palette {
    /// Monochrome panels can only show black and white
    pub fn for_mode(monochrome: bool, requested: Palette) -> Self {
        if monochrome {
            Palette::default()
        } else {
            requested
        }
    }
}

/// Draw one frame onto `target`
pub fn paint<D>(layout: &FrameLayout, palette: &Palette, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(palette.background)?;

    let eye_style = PrimitiveStyle::with_fill(palette.eye);
    let lid_style = PrimitiveStyle::with_fill(palette.background);

    rounded(&layout.left).into_styled(eye_style).draw(target)?;
    rounded(&layout.right).into_styled(eye_style).draw(target)?;

    for lid in &layout.lids {
        match lid {
            Lid::Top([a, b, c, d]) => {
                Triangle::new(point(a), point(b), point(c))
                    .into_styled(lid_style)
                    .draw(target)?;
                Triangle::new(point(a), point(c), point(d))
                    .into_styled(lid_style)
                    .draw(target)?;
            }
            Lid::Bottom(rect) => {
                rounded(rect).into_styled(lid_style).draw(target)?;
            }
        }
    }

    Ok(())
}

fn point(p: &LayoutPoint) -> Point {
    Point::new(p.x, p.y)
}

fn rounded(rect: &EyeRect) -> RoundedRectangle {
    let radius = rect.radius.max(0) as u32;
    RoundedRectangle::with_equal_corners(
        Rectangle::with_corners(Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y1)),
        Size::new(radius, radius),
    )
}
