use gfxpoly::{Canvas, Rule};

fn square(x0: f64, y0: f64, side: f64) -> gfxpoly::Polygon {
    let mut canvas = Canvas::new(1.0);
    canvas.move_to(x0, y0);
    canvas.line_to(x0 + side, y0);
    canvas.line_to(x0 + side, y0 + side);
    canvas.line_to(x0, y0 + side);
    canvas.close();
    canvas.result()
}

fn main() {
    // subject polygon
    let subject = square(5.0, 5.0, 5.0);

    // same as subject but offset by 2.0 in x
    let clip = square(7.0, 5.0, 5.0);

    let union = subject.union(&clip).expect("union");
    let intersection = subject.intersect(&clip).expect("intersect");

    println!("subject area: {}", subject.area());
    println!("clip area: {}", clip.area());
    println!("union area: {}", union.area());
    println!("intersection area: {}", intersection.area());

    let mut buf = Vec::new();
    gfxpoly::save(&union, &mut buf).expect("save");
    println!("union persisted form:\n{}", String::from_utf8_lossy(&buf));
}
