/// Bullet spawning, travel and hit tests.

use crate::entities::{Body, Bullet, BulletOwner, Facing, Rect};
use crate::rules::Rules;

impl Bullet {
    /// Spawn a bullet at the shooter's leading edge: just right of its
    /// hitbox when travelling right, just left of it when travelling left.
    pub fn fired_by(
        owner: BulletOwner,
        shooter: &Body,
        direction: Facing,
        y: f32,
        rules: &Rules,
    ) -> Bullet {
        let size = rules.bullet_size;
        let x = match direction {
            Facing::Right => shooter.hitbox().right(),
            Facing::Left => shooter.pos.x - size.x,
        };
        let mut body = Body::new(x, y, size.x, size.y);
        body.facing = direction;
        body.vel.x = rules.bullet_speed * direction.sign();
        Bullet {
            body,
            direction,
            speed: rules.bullet_speed,
            owner,
        }
    }

    pub fn advance(&mut self) {
        self.body.integrate();
    }

    /// Fully left of the arena or fully right of it.
    pub fn is_off_screen(&self, width: f32) -> bool {
        let hb = self.body.hitbox();
        hb.right() < 0.0 || hb.x > width
    }

    /// The side this bullet is allowed to damage.
    pub fn target(&self) -> BulletOwner {
        match self.owner {
            BulletOwner::Player => BulletOwner::Boss,
            BulletOwner::Boss => BulletOwner::Player,
        }
    }

    pub fn strikes(&self, target: &Rect) -> bool {
        self.body.hitbox().intersects(target)
    }
}
