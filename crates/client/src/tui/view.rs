use glam::Vec2;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};

use drift::{Entity, HISTORY_CAPACITY};

use crate::net::NetworkClient;

/// Half the visible world width, in world units.
const VIEW_HALF_WIDTH: f64 = 40.0;
const BODY_LENGTH: f32 = 3.0;
const BODY_WIDTH: f32 = 1.0;

pub fn render(frame: &mut Frame, client: &NetworkClient) {
    let [world_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    render_world(frame, world_area, client);
    render_status(frame, status_area, client);
}

fn render_world(frame: &mut Frame, area: Rect, client: &NetworkClient) {
    let session = client.session();
    let focus = session
        .controlled_entity()
        .map(|e| e.position)
        .unwrap_or(Vec2::ZERO);

    // Terminal cells are roughly twice as tall as they are wide.
    let aspect = if area.width > 0 {
        (area.height as f64 * 2.0) / area.width as f64
    } else {
        1.0
    };
    let half_height = VIEW_HALF_WIDTH * aspect;

    // World y grows downward; the canvas y axis grows upward.
    let (cx, cy) = (focus.x as f64, -(focus.y as f64));

    let canvas = Canvas::default()
        .block(Block::default().title(" drift ").borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([cx - VIEW_HALF_WIDTH, cx + VIEW_HALF_WIDTH])
        .y_bounds([cy - half_height, cy + half_height])
        .paint(|ctx| {
            for entity in session.entities().iter() {
                for line in body_outline(entity) {
                    ctx.draw(&line);
                }
            }
        });

    frame.render_widget(canvas, area);
}

/// A `BODY_LENGTH` x `BODY_WIDTH` bar anchored at the entity's position,
/// centred on its width and rotated by its orientation.
fn body_outline(entity: &Entity) -> [CanvasLine; 4] {
    let (r, g, b) = entity.color.rgb();
    let color = Color::Rgb(r, g, b);

    let forward = Vec2::from_angle(entity.orientation) * BODY_LENGTH;
    let side = Vec2::from_angle(entity.orientation).perp() * (BODY_WIDTH * 0.5);

    let rear_left = entity.position - side;
    let rear_right = entity.position + side;
    let front_left = rear_left + forward;
    let front_right = rear_right + forward;

    let edge = |a: Vec2, b: Vec2| {
        CanvasLine::new(a.x as f64, -(a.y as f64), b.x as f64, -(b.y as f64), color)
    };

    [
        edge(rear_left, rear_right),
        edge(rear_right, front_right),
        edge(front_right, front_left),
        edge(front_left, rear_left),
    ]
}

fn render_status(frame: &mut Frame, area: Rect, client: &NetworkClient) {
    let session = client.session();
    let clock = session.clock();

    let controlled = match session.controlled_id() {
        Some(id) => format!("entity {}", id),
        None => String::from("spectating"),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {:?} ", client.state()),
            Style::default().fg(if client.is_connected() {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::raw(format!(
            "| {} | tick {}{} | rtt {} ms | history {}/{} | entities {} | q to quit",
            controlled,
            clock.now_tick(),
            if clock.is_synced() { "" } else { " (unsynced)" },
            client.round_trip_ms(),
            session.history().len(),
            HISTORY_CAPACITY,
            session.entities().len(),
        )),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use drift::Color as EntityColor;

    use super::*;

    #[test]
    fn outline_follows_orientation() {
        let entity = Entity::new(
            1,
            EntityColor(0x10_20_30_ff),
            Vec2::new(2.0, 0.0),
            std::f32::consts::FRAC_PI_2,
        );

        let [rear, right, _, _] = body_outline(&entity);
        assert_eq!(rear.color, Color::Rgb(0x10, 0x20, 0x30));

        // Facing +y in world space, which is -y on the canvas.
        assert!((right.y2 - right.y1 + 3.0).abs() < 1e-5);
        assert!((right.x2 - right.x1).abs() < 1e-5);
    }
}
