use anyhow::{bail, Context, Result};
use cgmath::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use xml::reader::{EventReader, XmlEvent};
use xml::writer::{EmitterConfig, EventWriter, XmlEvent as WriterEvent};

use crate::{actor::EntityId, checkpoint::Checkpoint, surface::Surface, tile::Tile};

/// Who an obstacle's action listens to. The player has no fixed identifier in the
/// document; it is bound when a level is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionSource {
    Player,
    Obstacle(EntityId),
}

impl FromStr for ReactionSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("player") {
            Ok(ReactionSource::Player)
        } else {
            let id = s
                .parse()
                .with_context(|| format!("Expected action source \"{}\" to be \"player\" or an obstacle id", s))?;
            Ok(ReactionSource::Obstacle(id))
        }
    }
}

impl std::fmt::Display for ReactionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReactionSource::Player => write!(f, "player"),
            ReactionSource::Obstacle(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionData {
    pub source: ReactionSource,
    pub state: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObstacleShape {
    Platform { speed: f32, path: Vec<Point2<f32>> },
    Switch { position: Point2<f32> },
    Door { position: Point2<f32> },
}

impl ObstacleShape {
    fn element_name(&self) -> &'static str {
        match self {
            ObstacleShape::Platform { .. } => "platform",
            ObstacleShape::Switch { .. } => "switch",
            ObstacleShape::Door { .. } => "door",
        }
    }
}

/// An obstacle as authored. States are kept as raw integers here; they are
/// validated against the obstacle kind when the level is built.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleData {
    pub id: EntityId,
    pub width: f32,
    pub height: f32,
    pub initial_state: i32,
    pub actions: Vec<ActionData>,
    pub shape: ObstacleShape,
}

/// The authored description of a level, as read from and written to XML:
///
/// ```xml
/// <level id="0" gravity="9.8" width="2000" height="1500">
///   <checkpoints>
///     <checkpoint x="1400" y="1409" bound_x="1400" bound_y="1409" quadrant="1"/>
///   </checkpoints>
///   <tiles>
///     <tile x="0" y="0" width="2000" height="40" surface="absorbs"/>
///   </tiles>
///   <obstacles>
///     <switch id="1" x="1980" y="815" width="20" height="100" initial_state="2">
///       <action source="player" state="1"/>
///     </switch>
///   </obstacles>
/// </level>
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LevelData {
    pub id: u32,
    pub gravity: f32,
    pub width: f32,
    pub height: f32,
    pub checkpoints: Vec<Checkpoint>,
    pub tiles: Vec<Tile>,
    pub obstacles: Vec<ObstacleData>,
}

// ---------------------------------------------------------------------------------------------------------------------

struct Attributes<'a> {
    element: &'a str,
    values: HashMap<String, String>,
}

impl<'a> Attributes<'a> {
    fn new(element: &'a str, attributes: Vec<xml::attribute::OwnedAttribute>) -> Self {
        Self {
            element,
            values: attributes
                .into_iter()
                .map(|a| (a.name.local_name, a.value))
                .collect(),
        }
    }

    fn get<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value = self
            .values
            .get(name)
            .with_context(|| format!("<{}> element missing a '{}' attribute.", self.element, name))?;
        value.parse().with_context(|| {
            format!(
                "Expected to parse '{}' attr of <{}> from \"{}\"",
                name, self.element, value
            )
        })
    }

    fn get_raw(&self, name: &str) -> Result<&str> {
        self.values
            .get(name)
            .map(|s| s.as_str())
            .with_context(|| format!("<{}> element missing a '{}' attribute.", self.element, name))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl LevelData {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
        Self::parse(BufReader::new(file))
            .with_context(|| format!("Unable to parse level document {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        self.write(BufWriter::new(file))
            .with_context(|| format!("Unable to write level document {}", path.display()))
    }

    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        let parser = EventReader::new(reader);

        let mut level: Option<LevelData> = None;
        let mut current_obstacle: Option<ObstacleData> = None;

        for e in parser {
            match e.context("Malformed level document")? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    let element = name.local_name.as_str();
                    let attrs = Attributes::new(element, attributes);
                    match element {
                        "level" => {
                            level = Some(LevelData {
                                id: attrs.get("id")?,
                                gravity: attrs.get("gravity")?,
                                width: attrs.get("width")?,
                                height: attrs.get("height")?,
                                checkpoints: vec![],
                                tiles: vec![],
                                obstacles: vec![],
                            });
                        }
                        "checkpoint" => {
                            let checkpoint = Checkpoint::new(
                                point2(attrs.get("x")?, attrs.get("y")?),
                                point2(attrs.get("bound_x")?, attrs.get("bound_y")?),
                                attrs.get("quadrant")?,
                            )?;
                            level_mut(&mut level, element)?.checkpoints.push(checkpoint);
                        }
                        "tile" => {
                            let surface: Surface = attrs.get_raw("surface")?.parse()?;
                            let tile = Tile::from_xywh(
                                attrs.get("x")?,
                                attrs.get("y")?,
                                attrs.get("width")?,
                                attrs.get("height")?,
                                surface,
                            );
                            level_mut(&mut level, element)?.tiles.push(tile);
                        }
                        "platform" | "switch" | "door" => {
                            if current_obstacle.is_some() {
                                bail!("<{}> can't be nested inside another obstacle", element);
                            }
                            let shape = match element {
                                "platform" => ObstacleShape::Platform {
                                    speed: attrs.get("speed")?,
                                    path: vec![],
                                },
                                "switch" => ObstacleShape::Switch {
                                    position: point2(attrs.get("x")?, attrs.get("y")?),
                                },
                                _ => ObstacleShape::Door {
                                    position: point2(attrs.get("x")?, attrs.get("y")?),
                                },
                            };
                            current_obstacle = Some(ObstacleData {
                                id: attrs.get("id")?,
                                width: attrs.get("width")?,
                                height: attrs.get("height")?,
                                initial_state: attrs.get("initial_state")?,
                                actions: vec![],
                                shape,
                            });
                        }
                        "waypoint" => match &mut current_obstacle {
                            Some(ObstacleData {
                                shape: ObstacleShape::Platform { path, .. },
                                ..
                            }) => path.push(point2(attrs.get("x")?, attrs.get("y")?)),
                            _ => bail!("<waypoint> must be inside a <platform>"),
                        },
                        "action" => {
                            let action = ActionData {
                                source: attrs.get_raw("source")?.parse()?,
                                state: attrs.get("state")?,
                            };
                            match &mut current_obstacle {
                                Some(obstacle) => obstacle.actions.push(action),
                                None => bail!("<action> must be inside an obstacle element"),
                            }
                        }
                        _ => {}
                    }
                }
                XmlEvent::EndElement { name } => {
                    if let "platform" | "switch" | "door" = name.local_name.as_str() {
                        if let Some(obstacle) = current_obstacle.take() {
                            level_mut(&mut level, &name.local_name)?
                                .obstacles
                                .push(obstacle);
                        }
                    }
                }
                _ => {}
            }
        }

        level.context("Level document has no <level> element")
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut w = EmitterConfig::new()
            .perform_indent(true)
            .create_writer(writer);

        start(
            &mut w,
            "level",
            &[
                ("id", self.id.to_string()),
                ("gravity", self.gravity.to_string()),
                ("width", self.width.to_string()),
                ("height", self.height.to_string()),
            ],
        )?;

        start(&mut w, "checkpoints", &[])?;
        for c in &self.checkpoints {
            start(
                &mut w,
                "checkpoint",
                &[
                    ("x", c.location.x.to_string()),
                    ("y", c.location.y.to_string()),
                    ("bound_x", c.bound.x.to_string()),
                    ("bound_y", c.bound.y.to_string()),
                    ("quadrant", c.quadrant.to_string()),
                ],
            )?;
            end(&mut w)?;
        }
        end(&mut w)?;

        start(&mut w, "tiles", &[])?;
        for t in &self.tiles {
            start(
                &mut w,
                "tile",
                &[
                    ("x", t.bounds.left().to_string()),
                    ("y", t.bounds.top().to_string()),
                    ("width", t.bounds.width().to_string()),
                    ("height", t.bounds.height().to_string()),
                    ("surface", t.surface.name().to_string()),
                ],
            )?;
            end(&mut w)?;
        }
        end(&mut w)?;

        start(&mut w, "obstacles", &[])?;
        for o in &self.obstacles {
            let mut attrs = vec![
                ("id", o.id.to_string()),
                ("width", o.width.to_string()),
                ("height", o.height.to_string()),
                ("initial_state", o.initial_state.to_string()),
            ];
            match &o.shape {
                ObstacleShape::Platform { speed, .. } => attrs.push(("speed", speed.to_string())),
                ObstacleShape::Switch { position } | ObstacleShape::Door { position } => {
                    attrs.push(("x", position.x.to_string()));
                    attrs.push(("y", position.y.to_string()));
                }
            }
            start(&mut w, o.shape.element_name(), &attrs)?;

            if let ObstacleShape::Platform { path, .. } = &o.shape {
                for p in path {
                    start(
                        &mut w,
                        "waypoint",
                        &[("x", p.x.to_string()), ("y", p.y.to_string())],
                    )?;
                    end(&mut w)?;
                }
            }
            for a in &o.actions {
                start(
                    &mut w,
                    "action",
                    &[("source", a.source.to_string()), ("state", a.state.to_string())],
                )?;
                end(&mut w)?;
            }
            end(&mut w)?;
        }
        end(&mut w)?;

        end(&mut w)?;
        Ok(())
    }
}

fn level_mut<'a>(level: &'a mut Option<LevelData>, element: &str) -> Result<&'a mut LevelData> {
    level
        .as_mut()
        .with_context(|| format!("<{}> must be inside a <level> element", element))
}

fn start<W: Write>(w: &mut EventWriter<W>, name: &str, attrs: &[(&str, String)]) -> Result<()> {
    let mut element = WriterEvent::start_element(name);
    for (key, value) in attrs {
        element = element.attr(*key, value.as_str());
    }
    w.write(element)?;
    Ok(())
}

fn end<W: Write>(w: &mut EventWriter<W>) -> Result<()> {
    w.write(WriterEvent::end_element())?;
    Ok(())
}
