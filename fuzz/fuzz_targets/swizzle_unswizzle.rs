#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};

extern crate rand;
use rand::{rngs::StdRng, Rng, SeedableRng};

use console_swizzler::{GobsHeight, Platform, SwizzleContext};

#[derive(Debug)]
struct Input {
    platform: Platform,
    width: i32,
    height: i32,
    block_width: i32,
    block_height: i32,
    block_data_size: i32,
    has_mips: bool,
    array_size: i32,
    gobs_height: GobsHeight,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            platform: u.arbitrary()?,
            width: u.int_in_range(-1..=256)?,
            height: u.int_in_range(-1..=256)?,
            block_width: u.int_in_range(0..=12)?,
            block_height: u.int_in_range(0..=12)?,
            block_data_size: u.int_in_range(0..=32)?,
            has_mips: u.arbitrary()?,
            array_size: u.int_in_range(0..=6)?,
            gobs_height: u.arbitrary()?,
        })
    }
}

fuzz_target!(|input: Input| {
    let mut context = SwizzleContext::new();
    let configured = context.set_platform(input.platform).is_ok()
        && context.set_texture_size(input.width, input.height).is_ok()
        && context
            .set_block_info(input.block_width, input.block_height, input.block_data_size)
            .is_ok()
        && context.set_array_size(input.array_size).is_ok()
        && context.set_gobs_height(input.gobs_height as i32).is_ok();
    context.set_has_mips(input.has_mips);

    if !configured {
        // Invalid configurations should report errors instead of panicking.
        assert_eq!(0, context.swizzled_size());
        assert!(context.swizzle_to_vec(&[]).is_err());
        return;
    }

    let seed = [13u8; 32];
    let mut rng: StdRng = SeedableRng::from_seed(seed);
    let linear: Vec<_> = (0..context.unswizzled_size())
        .map(|_| rng.gen_range::<u8, _>(0..=255))
        .collect();

    let swizzled = context.swizzle_to_vec(&linear).unwrap();
    let new_linear = context.unswizzle_to_vec(&swizzled).unwrap();

    if linear != new_linear {
        panic!("Swizzle unswizzle is not 1:1");
    }
});
