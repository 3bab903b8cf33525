#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};

use console_swizzler::{Platform, SwizzleContext, SwizzleError};

#[derive(Debug)]
struct Input {
    platform: Platform,
    width: i32,
    height: i32,
    block_data_size: i32,
    gobs_height: i32,
    input_size: usize,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            platform: u.arbitrary()?,
            width: u.int_in_range(0..=4096)?,
            height: u.int_in_range(0..=4096)?,
            block_data_size: u.int_in_range(1..=32)?,
            gobs_height: u.int_in_range(0..=32)?,
            input_size: u.int_in_range(0..=16777216)?,
        })
    }
}

fuzz_target!(|input: Input| {
    let mut context = SwizzleContext::new();
    let _ = context.set_platform(input.platform);
    let _ = context.set_texture_size(input.width, input.height);
    let _ = context.set_block_info(1, 1, input.block_data_size);
    let _ = context.set_gobs_height(input.gobs_height);

    // Source buffers of any size should return an error instead of panicking.
    let source = vec![0u8; input.input_size];
    let expected_size = context.swizzled_size();
    match context.unswizzle_to_vec(&source) {
        Ok(linear) => {
            assert!(input.input_size >= expected_size);
            assert_eq!(context.unswizzled_size(), linear.len());
        }
        Err(SwizzleError::NotEnoughData {
            expected_size: size,
            actual_size,
        }) => {
            assert_eq!(expected_size, size);
            assert_eq!(input.input_size, actual_size);
        }
        Err(error) => assert_eq!(Some(error), context.last_error()),
    }
});
