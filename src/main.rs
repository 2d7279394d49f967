#![allow(non_snake_case)]
#![allow(unused_parens)]

extern crate ndarray;
extern crate pretty_env_logger;
#[macro_use] extern crate log;

use ndarray::*;
use rand::prelude::*;
use rand::rngs::StdRng;

use macau_lib::bpmf_prior::*;
use macau_lib::error::*;
use macau_lib::latent_prior::*;
use macau_lib::macau_prior::*;
use macau_lib::rand_utils::*;
use macau_lib::sparse_matrix::*;

const NUM_USERS : usize = 300;
const NUM_ITEMS : usize = 200;
const NUM_FEATURES : usize = 5;
const NUM_LATENT : usize = 4;
const DENSITY : f64 = 0.1;
const ALPHA : f64 = 4.0;
const NUM_ITERS : u64 = 40;

fn rmse(ratings : &RatingMatrix, mean_value : f64, u : &Array2<f64>, v : &Array2<f64>) -> f64 {
    let mut sq_err = 0.0f64;
    for (i, j, value) in ratings.triplets() {
        let pred = u.column(i).dot(&v.column(j)) + mean_value;
        sq_err += (pred - value) * (pred - value);
    }
    (sq_err / (ratings.nnz() as f64)).sqrt()
}

///Synthetic ratings whose user factors are partly explained by user features.
fn synthetic_problem(rng : &mut StdRng) -> SamplerResult<(RatingMatrix, RatingMatrix, Array2<f64>)> {
    let features = generate_standard_normal_matrix(rng, NUM_USERS, NUM_FEATURES);
    let link = generate_standard_normal_matrix(rng, NUM_LATENT, NUM_FEATURES);
    let mut u_true = link.dot(&features.t());
    u_true += &generate_standard_normal_matrix(rng, NUM_LATENT, NUM_USERS);
    let v_true = generate_standard_normal_matrix(rng, NUM_LATENT, NUM_ITEMS);

    let mut train = Vec::new();
    let mut test = Vec::new();
    for i in 0..NUM_USERS {
        for j in 0..NUM_ITEMS {
            let p : f64 = rng.gen();
            if (p < DENSITY) {
                let noise : f64 = generate_standard_normal_random(rng, 1)[0] / ALPHA.sqrt();
                let value = u_true.column(i).dot(&v_true.column(j)) + noise;
                let is_test : f64 = rng.gen();
                if (is_test < 0.2f64) {
                    test.push((i, j, value));
                } else {
                    train.push((i, j, value));
                }
            }
        }
    }
    let train = RatingMatrix::from_triplets(NUM_USERS, NUM_ITEMS, &train)?;
    let test = RatingMatrix::from_triplets(NUM_USERS, NUM_ITEMS, &test)?;
    Ok((train, test, features))
}

fn run(name : &str, user_prior : &mut dyn LatentPrior, train : &RatingMatrix, test : &RatingMatrix,
       rng : &mut StdRng) -> SamplerResult<()> {
    let train_t = train.transpose();
    let mean_value = train.mean_value();
    let mut item_prior = BpmfPrior::new(NUM_LATENT);

    let mut u = generate_standard_normal_matrix(rng, NUM_LATENT, NUM_USERS);
    let mut v = generate_standard_normal_matrix(rng, NUM_LATENT, NUM_ITEMS);

    for iter in 0..NUM_ITERS {
        user_prior.update_prior(u.view(), rng)?;
        user_prior.sample_latents(&mut u, train, mean_value, v.view(), ALPHA, rng.gen())?;

        item_prior.update_prior(v.view(), rng)?;
        item_prior.sample_latents(&mut v, &train_t, mean_value, u.view(), ALPHA, rng.gen())?;

        info!("{} iter {}: train rmse {:.4}, test rmse {:.4}", name, iter,
              rmse(train, mean_value, &u, &v), rmse(test, mean_value, &u, &v));
    }
    Ok(())
}

fn main() -> SamplerResult<()> {
    pretty_env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let (train, test, features) = synthetic_problem(&mut rng)?;
    info!("{} training and {} test ratings", train.nnz(), test.nnz());

    let mut bpmf = BpmfPrior::new(NUM_LATENT);
    run("BPMF", &mut bpmf, &train, &test, &mut rng)?;

    let mut macau = MacauPrior::new(NUM_LATENT, features, &SideInfoConfig::default())?;
    run("Macau", &mut macau, &train, &test, &mut rng)?;
    info!("Macau link matrix:\n{}", macau.beta());

    Ok(())
}
