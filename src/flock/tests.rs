#[cfg(test)]
mod units {
    use crate::boid::Boid;
    use crate::config::{EngineConfig, EngineContext, NeighbourhoodLayout};
    use crate::flock::neighbourhood::{GlobalBoidStore, Neighbourhood};
    use crate::flock::{Flock, WorldSnapshot};
    use crate::ids::{BoidId, FlockId};
    use crate::tracer::Tracer;
    use crate::vector::Vec2;
    use std::collections::HashMap;

    fn ctx_with(mutate: impl FnOnce(&mut EngineConfig)) -> EngineContext {
        let mut cfg = EngineConfig::default();
        mutate(&mut cfg);
        EngineContext::new(cfg).unwrap()
    }

    fn singleton(id: usize, pos: Vec2, radius: f64, layout: NeighbourhoodLayout) -> Flock {
        let boid = Boid::new(BoidId(id), FlockId(id), pos, Vec2::zero());
        Flock::new_singleton(boid, radius, Neighbourhood::new(layout))
    }

    #[test]
    fn new_singleton_bbox_covers_its_one_member() {
        let f = singleton(0, Vec2::new(10.0, 10.0), 2.0, NeighbourhoodLayout::Local);
        assert!(f.bbox.contains(Vec2::new(10.0, 10.0)));
        assert_eq!(f.bbox.top_left, Vec2::new(8.0, 8.0));
        assert_eq!(f.bbox.bottom_right, Vec2::new(12.0, 12.0));
        assert!(f.valid);
        assert_eq!(f.member_count(None), 1);
    }

    #[test]
    fn delegate_keeps_a_lone_flock_as_its_own_destination() {
        let ctx = ctx_with(|_| {});
        let tracer = Tracer::new(1, 1, false);
        let mut f = singleton(0, Vec2::new(0.0, 0.0), 4.0, NeighbourhoodLayout::Local);
        let snapshot = WorldSnapshot::capture(&HashMap::from([(FlockId(0), singleton(0, Vec2::zero(), 4.0, NeighbourhoodLayout::Local))]), None);
        f.delegate(0, &snapshot, None, &ctx, &tracer);
        assert_eq!(f.emigrants.len(), 1);
        assert!(f.emigrants.contains_key(&FlockId(0)));
        assert_eq!(f.emigrants[&FlockId(0)].len(), 1);
    }

    #[test]
    fn delegate_routes_a_boid_to_a_closer_flock_within_collision_radius() {
        let ctx = ctx_with(|c| {
            c.neighbourhood_radius = 1000.0;
            c.collision_radius = 50.0;
            c.weight_flock_size = 1.0;
            c.weight_flock_dist = 0.0;
        });
        let tracer = Tracer::new(2, 1, false);
        let mut flocks = HashMap::new();
        flocks.insert(FlockId(0), singleton(0, Vec2::new(0.0, 0.0), 4.0, NeighbourhoodLayout::Local));
        // flock 1 has two boids already, so its size beats flock 0's size of 1
        let b1 = Boid::new(BoidId(1), FlockId(1), Vec2::new(10.0, 0.0), Vec2::zero());
        let b2 = Boid::new(BoidId(2), FlockId(1), Vec2::new(10.0, 5.0), Vec2::zero());
        let mut f1 = singleton(1, Vec2::new(10.0, 0.0), 4.0, NeighbourhoodLayout::Local);
        if let Neighbourhood::Local(boids) = f1.neighbourhood_mut_for_test() {
            *boids = vec![b1, b2];
        }
        f1.compute_bounding_box(4.0, None);
        flocks.insert(FlockId(1), f1);

        let snapshot = WorldSnapshot::capture(&flocks, None);
        let f0 = flocks.get_mut(&FlockId(0)).unwrap();
        f0.delegate(0, &snapshot, None, &ctx, &tracer);
        assert!(f0.emigrants.contains_key(&FlockId(1)));
    }

    #[test]
    fn assign_to_flock_is_noop_when_one_flock_remains() {
        let mut f = singleton(0, Vec2::zero(), 4.0, NeighbourhoodLayout::Local);
        f.emigrants.clear();
        let all_emigrants = HashMap::new();
        f.assign_to_flock(0, 1, &all_emigrants, None);
        assert_eq!(f.member_count(None), 1);
    }

    #[test]
    fn assign_to_flock_rebuilds_local_membership_from_every_bucket() {
        let mut f0 = singleton(0, Vec2::zero(), 4.0, NeighbourhoodLayout::Local);
        let incoming = Boid::new(BoidId(5), FlockId(0), Vec2::new(1.0, 1.0), Vec2::zero());
        let mut all_emigrants: HashMap<FlockId, HashMap<FlockId, Vec<Boid>>> = HashMap::new();
        all_emigrants.insert(FlockId(7), HashMap::from([(FlockId(0), vec![incoming])]));
        f0.assign_to_flock(0, 2, &all_emigrants, None);
        assert_eq!(f0.member_count(None), 1);
    }

    #[test]
    fn compute_bounding_box_leaves_empty_flock_invalid() {
        let mut f = singleton(0, Vec2::zero(), 4.0, NeighbourhoodLayout::Local);
        f.neighbourhood_mut_for_test().local_boids_mut().clear();
        f.compute_bounding_box(4.0, None);
        assert!(!f.valid);
    }

    #[test]
    fn clean_up_removes_invalid_flocks_only() {
        let mut flocks = HashMap::new();
        let mut dead = singleton(0, Vec2::zero(), 4.0, NeighbourhoodLayout::Local);
        dead.valid = false;
        let alive = singleton(1, Vec2::zero(), 4.0, NeighbourhoodLayout::Local);
        flocks.insert(FlockId(0), dead);
        flocks.insert(FlockId(1), alive);
        Flock::clean_up(&mut flocks, None);
        assert_eq!(flocks.len(), 1);
        assert!(flocks.contains_key(&FlockId(1)));
    }

    #[test]
    fn global_layout_sense_and_plan_and_act_round_trip() {
        let ctx = ctx_with(|c| {
            c.neighbourhood_radius = 1000.0;
            c.cohesion = 1.0;
            c.alignment = 0.0;
            c.separation = 0.0;
        });
        let tracer = Tracer::new(2, 1, false);
        let b0 = Boid::new(BoidId(0), FlockId(0), Vec2::zero(), Vec2::zero());
        let b1 = Boid::new(BoidId(1), FlockId(1), Vec2::new(10.0, 0.0), Vec2::zero());
        let store = GlobalBoidStore::new(vec![b0, b1]);

        let mut f0 = singleton(0, Vec2::zero(), 4.0, NeighbourhoodLayout::Global);
        let f1 = singleton(1, Vec2::new(10.0, 0.0), 4.0, NeighbourhoodLayout::Global);
        let flocks = HashMap::from([(FlockId(0), singleton(0, Vec2::zero(), 4.0, NeighbourhoodLayout::Global)), (FlockId(1), f1)]);
        let snapshot = WorldSnapshot::capture(&flocks, Some(&store));

        f0.sense_and_plan(0, &snapshot, Some(&store), &ctx, &tracer);
        f0.act(1.0, &ctx, Some(&store));
        let moved = store.get(BoidId(0));
        assert!(moved.position.x > 0.0);
    }

    impl Flock {
        fn neighbourhood_mut_for_test(&mut self) -> &mut Neighbourhood {
            self.neighbourhood_mut()
        }
    }
}
