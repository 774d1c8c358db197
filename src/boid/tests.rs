#[cfg(test)]
mod units {
    use crate::boid::Boid;
    use crate::config::{EngineConfig, EngineContext};
    use crate::ids::{BoidId, FlockId};
    use crate::tracer::Tracer;
    use crate::vector::Vec2;

    fn ctx_with(mutate: impl FnOnce(&mut EngineConfig)) -> EngineContext {
        let mut cfg = EngineConfig::default();
        mutate(&mut cfg);
        EngineContext::new(cfg).unwrap()
    }

    #[test]
    fn sense_and_plan_is_noop_with_no_peers() {
        let ctx = ctx_with(|_| {});
        let tracer = Tracer::new(1, 1, false);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::new(10.0, 10.0), Vec2::zero());
        b.sense_and_plan(0, std::iter::empty(), &ctx, &tracer);
        assert_eq!(b.a1, Vec2::zero());
        assert_eq!(b.a2, Vec2::zero());
        assert_eq!(b.a3, Vec2::zero());
    }

    #[test]
    fn sense_and_plan_skips_self() {
        let ctx = ctx_with(|_| {});
        let tracer = Tracer::new(1, 1, false);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::new(10.0, 10.0), Vec2::zero());
        let self_copy = b;
        b.sense_and_plan(0, std::iter::once(&self_copy), &ctx, &tracer);
        // no peers contributed, so accumulators stay zero
        assert_eq!(b.a1, Vec2::zero());
    }

    #[test]
    fn sense_and_plan_ignores_peers_beyond_neighbourhood_radius() {
        let ctx = ctx_with(|c| c.neighbourhood_radius = 10.0);
        let tracer = Tracer::new(1, 1, false);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::zero(), Vec2::zero());
        let far = Boid::new(BoidId(1), FlockId(0), Vec2::new(100.0, 0.0), Vec2::zero());
        b.sense_and_plan(0, std::iter::once(&far), &ctx, &tracer);
        assert_eq!(b.a1, Vec2::zero());
    }

    #[test]
    fn sense_and_plan_cohesion_pulls_toward_neighbour_centre_of_mass() {
        let ctx = ctx_with(|c| {
            c.neighbourhood_radius = 1000.0;
            c.collision_radius = 0.0;
            c.cohesion = 1.0;
            c.alignment = 0.0;
            c.separation = 0.0;
        });
        let tracer = Tracer::new(1, 1, false);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::zero(), Vec2::zero());
        let peer = Boid::new(BoidId(1), FlockId(0), Vec2::new(10.0, 0.0), Vec2::zero());
        b.sense_and_plan(0, std::iter::once(&peer), &ctx, &tracer);
        assert_eq!(b.a1, Vec2::new(10.0, 0.0));
        assert_eq!(b.a2, Vec2::zero());
        assert_eq!(b.a3, Vec2::zero());
    }

    #[test]
    fn sense_and_plan_separation_pushes_away_from_close_neighbour() {
        let ctx = ctx_with(|c| {
            c.neighbourhood_radius = 1000.0;
            c.collision_radius = 1000.0;
            c.cohesion = 0.0;
            c.alignment = 0.0;
            c.separation = 1.0;
        });
        let tracer = Tracer::new(1, 1, false);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::zero(), Vec2::zero());
        let peer = Boid::new(BoidId(1), FlockId(0), Vec2::new(5.0, 0.0), Vec2::zero());
        b.sense_and_plan(0, std::iter::once(&peer), &ctx, &tracer);
        // separation subtracts (peer.position - self.position), so it points away
        assert_eq!(b.a2, Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn act_clamps_velocity_to_max_vel() {
        let ctx = ctx_with(|c| c.max_vel = 5.0);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::zero(), Vec2::new(3.0, 4.0));
        b.a1 = Vec2::new(30.0, 40.0);
        b.act(1.0, &ctx);
        assert!((b.velocity.norm() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn act_integrates_position_by_velocity_times_dt() {
        let ctx = ctx_with(|c| c.max_vel = 1000.0);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0));
        b.act(0.5, &ctx);
        assert_eq!(b.position, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn act_does_not_wrap_position_at_window_edge() {
        let ctx = ctx_with(|c| {
            c.window_x = 100.0;
            c.window_y = 100.0;
            c.max_vel = 1000.0;
        });
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::new(95.0, 95.0), Vec2::new(50.0, 50.0));
        b.act(1.0, &ctx);
        assert_eq!(b.position, Vec2::new(145.0, 145.0));
    }

    #[test]
    fn distance_predicates_use_radius_consistently() {
        let a = Boid::new(BoidId(0), FlockId(0), Vec2::new(0.0, 0.0), Vec2::zero());
        let b = Boid::new(BoidId(1), FlockId(0), Vec2::new(3.0, 4.0), Vec2::zero());
        assert_eq!(a.distance_to(&b), 5.0);
        assert!(a.distance_gt(&b, 4.0));
        assert!(!a.distance_gt(&b, 6.0));
        assert!(a.distance_lt(&b, 6.0));
        assert!(!a.distance_lt(&b, 4.0));
    }

    #[test]
    fn collision_pushback_separates_overlapping_boids() {
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::new(0.0, 0.0), Vec2::zero());
        let peer = Boid::new(BoidId(1), FlockId(1), Vec2::new(1.0, 0.0), Vec2::zero());
        let before = b.position;
        b.collision_pushback(std::iter::once(&peer), 4.0);
        assert!(b.position.x < before.x, "boid should be pushed away from the overlapping peer");
    }

    #[test]
    fn collision_pushback_ignores_peers_outside_contact_radius() {
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::new(0.0, 0.0), Vec2::zero());
        let peer = Boid::new(BoidId(1), FlockId(1), Vec2::new(100.0, 0.0), Vec2::zero());
        b.collision_pushback(std::iter::once(&peer), 4.0);
        assert_eq!(b.position, Vec2::zero());
    }

    #[test]
    fn collision_pushback_ignores_self() {
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::new(0.0, 0.0), Vec2::zero());
        let self_copy = b;
        b.collision_pushback(std::iter::once(&self_copy), 4.0);
        assert_eq!(b.position, Vec2::zero());
    }

    #[test]
    fn sense_and_plan_logs_a_read_for_every_peer_visited() {
        let ctx = ctx_with(|_| {});
        let tracer = Tracer::new(2, 1, true);
        let mut b = Boid::new(BoidId(0), FlockId(0), Vec2::zero(), Vec2::zero());
        let peer = Boid::new(BoidId(1), FlockId(1), Vec2::new(500.0, 500.0), Vec2::zero());
        // far outside any reasonable neighbourhood radius, but still logged
        b.sense_and_plan(0, std::iter::once(&peer), &ctx, &tracer);
        let mut buf = Vec::new();
        tracer.save_flock_matrix(|_, _| 0);
        tracer.dump(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("{ 1 }"));
    }
}
