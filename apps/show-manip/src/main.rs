// This file is part of Whirl.
//
// Whirl is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Whirl is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Whirl.  If not, see <http://www.gnu.org/licenses/>.
use anyhow::{anyhow, bail, Result};
use geometry::Aabb;
use manipulator::{DragMode, Manipulator, WorldTransform};
use structopt::StructOpt;
use vecmath::{Matrix4, Vector3};

/// Replay a pointer-drag script against a manipulator and print the transform
#[derive(Debug, StructOpt)]
struct Opt {
    /// Frame the view on a cube of this half-extent around the origin
    #[structopt(short, long)]
    bounds: Option<f32>,

    /// Vertical field of view in degrees, used with --bounds
    #[structopt(short, long, default_value = "45")]
    fov: f32,

    /// Also print the derived near/far clip planes
    #[structopt(long)]
    clips: bool,

    /// Drag commands, each MODE:DX,DY with mode one of rotate, roll, scroll,
    /// dolly and deltas as fractions of the window size
    drags: Vec<String>,
}

fn parse_drag(s: &str) -> Result<(DragMode, f32, f32)> {
    let (mode, delta) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected MODE:DX,DY, got '{}'", s))?;
    let mode = match mode {
        "rotate" => DragMode::Rotate,
        "roll" => DragMode::Roll,
        "scroll" => DragMode::Scroll,
        "dolly" => DragMode::Dolly,
        _ => bail!("unknown drag mode '{}'", mode),
    };
    let (dx, dy) = delta
        .split_once(',')
        .ok_or_else(|| anyhow!("expected DX,DY after the mode, got '{}'", delta))?;
    Ok((mode, dx.trim().parse()?, dy.trim().parse()?))
}

fn print_matrix(m: &Matrix4) {
    for row in 0..4 {
        println!(
            "  [ {:9.4} {:9.4} {:9.4} {:9.4} ]",
            m[row * 4],
            m[row * 4 + 1],
            m[row * 4 + 2],
            m[row * 4 + 3]
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut manip = if let Some(half) = opt.bounds {
        let bounds = Aabb::from_bounds(Vector3::splat(-half), Vector3::splat(half));
        Manipulator::framing(&bounds, opt.fov.to_radians())
    } else {
        Manipulator::new()
    };

    for drag in &opt.drags {
        let (mode, dx, dy) = parse_drag(drag)?;
        manip.set_mode(mode);
        manip.on_mousemove(dx, dy);
    }

    let rotation = manip.rotation();
    let translation = manip.translation();
    println!(
        "rotation:    {:.4} rad about <{:.4}, {:.4}, {:.4}>",
        rotation.angle, rotation.axis.x, rotation.axis.y, rotation.axis.z
    );
    println!(
        "translation: <{:.4}, {:.4}, {:.4}>",
        translation.x, translation.y, translation.z
    );
    println!("matrix:");
    print_matrix(&manip.world_matrix());

    if opt.clips {
        let (near, far) = manip.clip_range();
        println!("clips:       near {:.4}, far {:.4}", near, far);

        // A square-viewport projection bracketing the reference size, the way
        // a viewer would build one from this manipulator.
        let top = (opt.fov.to_radians() / 2f32).tan() * near;
        println!("projection:");
        print_matrix(&Matrix4::frustum(-top, top, -top, top, near, far));
    }

    Ok(())
}
